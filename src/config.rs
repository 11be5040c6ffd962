use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;

/// Serve the graph data tree and the frontend bundle that draws it.
#[derive(Clone, Debug, Parser)]
#[clap(version, about)]
pub struct ServerConfig {
    /// Address to listen on.
    #[clap(long, env = "TREE_VIEWER_HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Port to listen on.
    #[clap(short, long, env = "TREE_VIEWER_PORT", default_value_t = 3001)]
    pub port: u16,

    /// Directory holding the built frontend; its `index.html` is served for
    /// any path that isn't the API or an existing file.
    #[clap(long, env = "TREE_VIEWER_STATIC_DIR", default_value = "frontend/dist")]
    pub static_dir: PathBuf,

    /// JSON array of `{name, description, parent}` records to serve instead of
    /// the built-in dataset.  Read once at startup.
    #[clap(long, env = "TREE_VIEWER_DATA")]
    pub data: Option<PathBuf>,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn index_file(&self) -> PathBuf {
        self.static_dir.join("index.html")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        ServerConfig::command().debug_assert();
    }

    #[test]
    fn explicit_flags() {
        let config = ServerConfig::try_parse_from([
            "graph-server",
            "--host",
            "127.0.0.1",
            "--port",
            "8080",
            "--static-dir",
            "/srv/dist",
            "--data",
            "nodes.json",
        ])
        .unwrap();

        assert_eq!(config.socket_addr(), "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.index_file(), PathBuf::from("/srv/dist/index.html"));
        assert_eq!(config.data, Some(PathBuf::from("nodes.json")));
    }

    #[test]
    fn bad_port_is_rejected() {
        assert!(ServerConfig::try_parse_from(["graph-server", "--port", "nope"]).is_err());
    }
}
