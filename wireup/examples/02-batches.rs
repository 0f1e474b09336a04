// note: this example assumes you've analyzed the previous ones

use std::sync::Arc;
use std::thread::sleep;
use std::time::Duration;
use wireup::container::Container;
use wireup::injectable::Inject;
use wireup::lifecycle::{Cleaner, ErrorPtr, Initializer};
use wireup::Injectable;

// objects can opt in to initialization and cleanup with the injectable attribute
#[derive(Injectable, Default)]
#[injectable(init, clean)]
struct Connection;

impl Initializer for Connection {
    fn init(&self) -> Result<(), ErrorPtr> {
        // simulate a slow handshake
        sleep(Duration::from_millis(100));
        println!("Connection ready");
        Ok(())
    }
}

impl Cleaner for Connection {
    fn clean(&self) -> Result<(), ErrorPtr> {
        println!("Connection closed");
        Ok(())
    }
}

#[derive(Injectable, Default)]
#[injectable(init)]
struct Cache;

impl Initializer for Cache {
    fn init(&self) -> Result<(), ErrorPtr> {
        sleep(Duration::from_millis(100));
        println!("Cache warmed up");
        Ok(())
    }
}

#[derive(Injectable, Default)]
#[injectable(init)]
struct Server {
    connection: Inject<Connection>,
    cache: Inject<Cache>,
}

impl Initializer for Server {
    fn init(&self) -> Result<(), ErrorPtr> {
        println!("Server listening");
        Ok(())
    }
}

fn main() {
    let container = Container::new_debug()
        // Connection and Cache do not depend on each other, so init_async() closes them into a
        // single batch initialized concurrently
        .with_object(Arc::new(Connection))
        .expect("error registering Connection")
        .with_object(Arc::new(Cache))
        .expect("error registering Cache")
        .init_async()
        // Server is initialized only after the whole previous batch has finished
        .with_object(Arc::new(Server::default()))
        .expect("error registering Server")
        .initialize_graph()
        .expect("error initializing graph");

    // the guard stops the container when it goes out of scope, even on early returns
    let _guard = container.stop_guard();
}
