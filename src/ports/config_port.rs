//! Configuration access port trait.

pub trait ConfigPort {
    /// Trimmed value; blank values read as missing.
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
}
