use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
};

use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Browse and download this machine's files over HTTP", long_about = None)]
pub struct Args {
    /// HTML template the listings are embedded into
    #[arg(short, long, value_name = "FILE", default_value = "./client/index.html")]
    pub template: PathBuf,

    /// Address of the interface to listen on
    #[arg(short, long, value_name = "IP", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub bind: IpAddr,

    /// Port to listen on
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    /// Only serve paths inside this directory
    #[arg(short, long, value_name = "DIR")]
    pub root: Option<PathBuf>,
}

impl Args {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}
