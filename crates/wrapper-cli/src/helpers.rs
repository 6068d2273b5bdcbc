//! Shared CLI helpers: path expansion and the startup banner.

use std::net::SocketAddr;
use std::path::PathBuf;

use colored::Colorize;

/// Expand `~` at the start of a path to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_next::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs_next::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

/// Print the banner shown once both listeners are bound.
pub fn print_banner(model: &str, grpc: SocketAddr, http: SocketAddr) {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!("{}  v{}", "Wrapper".cyan().bold(), version.dimmed());
    println!();
    println!("  {:<8} {}", "Model:".bold(), model);
    println!("  {:<8} {}", "gRPC:".bold(), grpc);
    println!("  {:<8} http://{}/api/v1/generate", "HTTP:".bold(), http);
    println!("  {:<8} http://{}/swagger/", "Docs:".bold(), http);
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();
}

/// Print a warning line to stdout, for problems that don't stop startup.
pub fn print_warning(message: &str) {
    println!("  {}  {}", "⚠".yellow(), message);
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_tilde_home() {
        let result = expand_tilde("~/docs/openapi");
        assert!(result.ends_with("docs/openapi"));
        assert!(!result.starts_with("~"));
    }

    #[test]
    fn expand_tilde_relative_untouched() {
        assert_eq!(expand_tilde("docs/openapi"), PathBuf::from("docs/openapi"));
    }

    #[test]
    fn expand_tilde_mid_path_untouched() {
        assert_eq!(expand_tilde("/srv/~/x"), PathBuf::from("/srv/~/x"));
    }
}
