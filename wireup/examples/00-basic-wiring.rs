use std::sync::Arc;
use wireup::container::Container;
use wireup::injectable::Inject;
use wireup::Injectable;

// this is a dependency which will be injected into other objects
#[derive(Injectable, Default)]
struct Greeter;

impl Greeter {
    fn greet(&self) {
        println!("Hello world!");
    }
}

// this is an object with a dependency - every Inject field is filled by the container
#[derive(Injectable, Default)]
struct Service {
    greeter: Inject<Greeter>,
}

impl Service {
    fn run(&self) {
        // the field is guaranteed to be injected after the graph has been initialized
        if let Some(greeter) = self.greeter.get() {
            greeter.greet();
        }
    }
}

// note: for the sake of simplicity, errors are unwrapped, rather than gracefully handled
fn main() {
    // objects are created by the application and then registered in the container
    let service = Arc::new(Service::default());

    let container = Container::new()
        .with_object(Arc::new(Greeter))
        .expect("error registering Greeter")
        .with_object(service.clone())
        .expect("error registering Service")
        .initialize_graph()
        .expect("error initializing graph");

    // prints "Hello world!"
    service.run();

    container.stop();
}
