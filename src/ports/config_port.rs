//! Configuration access port trait.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;
    /// All section names, sorted.
    fn sections(&self) -> Vec<String>;
    /// All keys of a section, sorted; empty when the section is absent.
    fn get_keys(&self, section: &str) -> Vec<String>;
}
