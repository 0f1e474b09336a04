// note: this example assumes you've analyzed the previous one

use std::sync::Arc;
use wireup::container::Container;
use wireup::injectable::Inject;
use wireup::Injectable;

#[derive(Injectable)]
struct Database {
    url: String,
}

// when there are multiple objects of the same type, they can be distinguished by name
#[derive(Injectable, Default)]
struct Repository {
    #[inject(name = "primary")]
    primary: Inject<Database>,
    #[inject(name = "replica")]
    replica: Inject<Database>,
}

fn main() {
    let repository = Arc::new(Repository::default());

    let container = Container::new()
        .with_named_object(
            "primary",
            Arc::new(Database {
                url: "db://primary".to_string(),
            }),
        )
        .expect("error registering primary database")
        .with_named_object(
            "replica",
            Arc::new(Database {
                url: "db://replica".to_string(),
            }),
        )
        .expect("error registering replica database")
        .with_object(repository.clone())
        .expect("error registering Repository")
        .initialize_graph()
        .expect("error initializing graph");

    // prints "db://primary db://replica"
    if let (Some(primary), Some(replica)) = (repository.primary.get(), repository.replica.get()) {
        println!("{} {}", primary.url, replica.url);
    }

    // named objects can also be queried directly, which is useful in tests
    let replica = container
        .get_named_object::<Database>("replica")
        .expect("error getting replica");
    println!("{}", replica.url);

    container.stop();
}
