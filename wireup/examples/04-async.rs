// note: this example assumes you've analyzed the previous ones

use std::sync::Arc;
use std::time::Duration;
use wireup::container::Container;
use wireup::future::{BoxFuture, FutureExt};
use wireup::injectable::Inject;
use wireup::lifecycle::{Cleaner, ErrorPtr, Initializer};
use wireup::Injectable;

#[derive(Injectable, Default)]
#[injectable(init, clean)]
struct Connection;

// with the "async" feature, lifecycle hooks return futures
impl Initializer for Connection {
    fn init(&self) -> BoxFuture<'_, Result<(), ErrorPtr>> {
        async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            println!("Connection ready");
            Ok(())
        }
        .boxed()
    }
}

impl Cleaner for Connection {
    fn clean(&self) -> BoxFuture<'_, Result<(), ErrorPtr>> {
        async {
            println!("Connection closed");
            Ok(())
        }
        .boxed()
    }
}

#[derive(Injectable, Default)]
struct Server {
    connection: Inject<Connection>,
}

#[tokio::main]
async fn main() {
    let server = Arc::new(Server::default());

    // initialization and teardown become async
    let container = Container::new()
        .with_object(Arc::new(Connection))
        .expect("error registering Connection")
        .with_object(server.clone())
        .expect("error registering Server")
        .initialize_graph()
        .await
        .expect("error initializing graph");

    assert!(server.connection.is_injected());

    container.stop().await;
}
