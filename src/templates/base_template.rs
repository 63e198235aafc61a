/// Base template trait providing common properties for all pages.
/// This eliminates redundant field definitions across templates.
pub trait BaseTemplate {
    fn api_hostname(&self) -> &str;
    fn notice(&self) -> &Option<String>;
    fn error(&self) -> &Option<String>;
}

/// Macro to implement BaseTemplate for a struct with standard fields
#[macro_export]
macro_rules! impl_base_template {
    ($struct_name:ty) => {
        impl $crate::templates::BaseTemplate for $struct_name {
            fn api_hostname(&self) -> &str {
                &self.api_hostname
            }
            fn notice(&self) -> &Option<String> {
                &self.notice
            }
            fn error(&self) -> &Option<String> {
                &self.error
            }
        }
    };
}
