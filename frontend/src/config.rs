//! Build-time configuration.

// API base URL - 编译时从环境变量读取，默认本地开发地址
pub const API_BASE: &str = match option_env!("MODCONSOLE_API_BASE") {
    Some(url) => url,
    None => "http://localhost:5000/api",
};

/// Development builds may log in with a simulated moderator when the
/// backend is down. Set `MODCONSOLE_DEV_FALLBACK` at build time to enable.
pub const DEV_FALLBACK: bool = option_env!("MODCONSOLE_DEV_FALLBACK").is_some();
