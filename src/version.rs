pub const VERSION: &str = "v0.1.0";
