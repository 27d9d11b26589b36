//! Server configuration.

use clap::Parser;

/// Command line / environment configuration of the server
#[derive(Parser, Debug, Clone)]
#[command(name = "linkclub-server")]
#[command(about = "Presence and real-time signaling server for LinkClub", long_about = None)]
pub struct ServerConfig {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "LINKCLUB_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "LINKCLUB_PORT", default_value = "5001")]
    pub port: u16,

    /// Origin allowed to call the API from a browser (repeatable)
    #[arg(
        long = "allowed-origin",
        env = "LINKCLUB_ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:5173"
    )]
    pub allowed_origins: Vec<String>,

    /// Default log level (overridden by RUST_LOG)
    #[arg(long, default_value = "debug")]
    pub log_level: String,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        // テスト項目: 引数なしの場合はデフォルト値になる
        // given (前提条件):
        let args = ["linkclub-server"];

        // when (操作):
        let config = ServerConfig::try_parse_from(args).unwrap();

        // then (期待する結果):
        assert_eq!(config.bind_addr(), "127.0.0.1:5001");
        assert_eq!(config.allowed_origins, vec!["http://localhost:5173"]);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_multiple_origins() {
        // テスト項目: 許可するオリジンをカンマ区切り・複数指定できる
        // given (前提条件):
        let args = [
            "linkclub-server",
            "--port",
            "8080",
            "--allowed-origin",
            "http://a.test,http://b.test",
            "--allowed-origin",
            "http://c.test",
        ];

        // when (操作):
        let config = ServerConfig::try_parse_from(args).unwrap();

        // then (期待する結果):
        assert_eq!(config.port, 8080);
        assert_eq!(
            config.allowed_origins,
            vec!["http://a.test", "http://b.test", "http://c.test"]
        );
    }
}
