pub mod tier;

pub use tier::required_java_for_minecraft_version;
