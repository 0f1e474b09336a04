// note: this example assumes you've analyzed the previous ones

use std::sync::Arc;
use wireup::config::ContainerConfig;
use wireup::container::Container;
use wireup::injectable::Inject;
use wireup::Injectable;

#[derive(Injectable, Default)]
struct Clock;

// an implicit dependency is created from its Default implementation when it was not registered
#[derive(Injectable, Default)]
struct Scheduler {
    #[inject(implicit)]
    clock: Inject<Clock>,
}

fn main() {
    // a strict container rejects objects which were not explicitly registered
    let error = Container::new()
        .with_object(Arc::new(Scheduler::default()))
        .expect("error registering Scheduler")
        .initialize_graph()
        .expect_err("strict container should reject the implicit Clock");

    // prints "...Clock not explicitly created"
    println!("{error}");

    // strictness can be configured; the config can also be read from the environment with
    // Container::from_environment()
    let config = ContainerConfig::default().with_strict(false);

    let container = Container::from_config(&config)
        .with_object(Arc::new(Scheduler::default()))
        .expect("error registering Scheduler")
        .initialize()
        .expect("error initializing graph");

    for object in container.implicit_objects() {
        println!("Implicitly created: {}", object.type_name());
    }

    container.stop();
}
