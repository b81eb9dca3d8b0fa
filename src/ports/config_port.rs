//! Configuration access port trait.
//!
//! Numeric getters fall back to `default` when a key is absent or malformed;
//! `validate_config` reports malformed values before anything reads them.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;
}
