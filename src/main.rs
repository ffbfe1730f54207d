use clap::Parser;
use pagefold::document::Node;
use pagefold::{ClientConfig, ContentClient, ContentView, FetchStatus, Reachability};

mod args;
use args::Args;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match ClientConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                ::log::error!("Failed to load configuration {}: {}", path.display(), e);
                std::process::exit(2);
            }
        },
        None => ClientConfig::default(),
    };
    let mut client = ContentClient::from_config(config);

    // Apply command-line overrides
    if let Some(endpoint) = &args.endpoint {
        client = client.with_endpoint(endpoint);
    }
    if let Some(dir) = &args.cache_dir {
        client = client.with_cache_dir(dir);
    }
    if let Some(timeout) = args.timeout {
        client = client.with_timeout(timeout);
    }

    let reachability = Reachability::default();
    reachability.set_online(!args.offline);

    ::log::info!("Fetching content from {}", client.config().endpoint);
    let controller = match client.with_reachability(reachability).build() {
        Ok(controller) => controller,
        Err(e) => {
            ::log::error!("Invalid client configuration: {}", e);
            std::process::exit(2);
        }
    };

    if args.clear_cache {
        controller.clear_cache().await;
    }

    let mut status = controller.fetch().await;
    let mut attempts = 0;
    while status == FetchStatus::Failed && attempts < args.retry {
        attempts += 1;
        ::log::info!("Retrying ({} of {})", attempts, args.retry);
        status = controller.retry().await;
    }

    let view = controller.view().await;
    print_view(&view);

    if status == FetchStatus::Failed && view.pages.is_empty() {
        std::process::exit(1);
    }
}

fn print_view(view: &ContentView) {
    if let Some(message) = &view.error_message {
        println!("{}", message);
    }
    if view.is_offline {
        println!("[offline] showing saved content; run again to retry");
    }

    for (index, page) in view.pages.iter().enumerate() {
        println!("{}. {}", index + 1, page.title);
        for item in &page.items {
            print_node(item, 1);
        }
    }
}

fn print_node(node: &Node, depth: usize) {
    let indent = "  ".repeat(depth);
    match node {
        Node::Image(image) => println!("{}[{}] {} <{}>", indent, node.kind(), image.title, image.src),
        _ => println!("{}[{}] {}", indent, node.kind(), node.title()),
    }
    for child in node.items() {
        print_node(child, depth + 1);
    }
}
