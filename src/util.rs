pub fn hostname_from_url(u: &str) -> String {
    let s = u.trim();
    if s.is_empty() {
        return "".into();
    }
    let s = if let Some(idx) = s.find("://") { &s[idx + 3..] } else { s };
    let host = s.split('/').next().unwrap_or(s);
    host.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hostname_strips_scheme_and_path() {
        assert_eq!(hostname_from_url("http://localhost:8000/users/"), "localhost:8000");
        assert_eq!(hostname_from_url("https://api.example.com"), "api.example.com");
    }

    #[test]
    fn hostname_of_empty_url_is_empty() {
        assert_eq!(hostname_from_url(""), "");
        assert_eq!(hostname_from_url("   "), "");
    }
}
