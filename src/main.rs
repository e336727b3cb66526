use std::sync::Arc;

use clap::Parser;
use drive_browser::{
    address::resolve_advertised_address, config::Args, router, AppState, FixedVolumes,
    PageTemplate, SystemVolumes, VolumeSource,
};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Logs and prints a startup failure, then terminates the process.
macro_rules! fatal {
    ($($arg:tt)*) => {{
        let message = format!($($arg)*);
        error!("{}", message);
        eprintln!("Error: {}", message);
        std::process::exit(1)
    }};
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let template = match PageTemplate::load(&args.template) {
        Ok(t) => t,
        Err(e) => fatal!("Failed to load page template: {}", e),
    };

    let (volumes, root) = match &args.root {
        Some(dir) => {
            let root = match tokio::fs::canonicalize(dir).await {
                Ok(path) => path,
                Err(e) => fatal!("Failed to resolve root directory '{}': {}", dir.display(), e),
            };
            match tokio::fs::metadata(&root).await {
                Ok(meta) if meta.is_dir() => {}
                Ok(_) => fatal!("Root path '{}' is not a directory", root.display()),
                Err(e) => fatal!("Failed to read root directory '{}': {}", root.display(), e),
            }
            info!("Serving files from: {}", root.display());
            let volume = root.to_string_lossy().into_owned();
            (
                Box::new(FixedVolumes::new([volume])) as Box<dyn VolumeSource>,
                Some(root),
            )
        }
        None => (Box::new(SystemVolumes) as Box<dyn VolumeSource>, None),
    };

    match volumes.list_volumes() {
        Ok(names) => info!(count = names.len(), "Volumes available: {:?}", names),
        Err(e) => fatal!("Failed to enumerate volumes: {}", e),
    }

    let advertised = match resolve_advertised_address() {
        Ok(ip) => ip,
        Err(e) => fatal!("Failed to determine local address: {}", e),
    };

    let shared_state = Arc::new(AppState {
        template,
        volumes,
        root,
    });
    let app = router(shared_state);

    let bind_addr = args.listen_addr();
    let listener = match tokio::net::TcpListener::bind(bind_addr).await {
        Ok(l) => l,
        Err(e) => fatal!("Failed to bind to address {}: {}", bind_addr, e),
    };

    info!("Listening on: {}", bind_addr);
    println!("{}:{}", advertised, args.port);

    if let Err(e) = axum::serve(listener, app).await {
        fatal!("Server error: {}", e);
    }
}
