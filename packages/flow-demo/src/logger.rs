use std::env;

/// Installs the logger at info level unless RUST_LOG already says otherwise.
pub fn enable_info_logger() {
    if env::var_os("RUST_LOG").is_none() {
        env::set_var("RUST_LOG", "info");
    }
    pretty_env_logger::init(); // Used to log wizard steps and demo transactions
}
