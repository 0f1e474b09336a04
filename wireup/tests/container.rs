#[cfg(all(feature = "derive", not(feature = "async")))]
mod container_test {
    use std::fmt::{Display, Formatter};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use wireup::container::Container;
    use wireup::error::{ContainerError, ResolverError};
    use wireup::injectable::Inject;
    use wireup::lifecycle::{Cleaner, ErrorPtr, Initializer};
    use wireup::registry::Entry;
    use wireup::Injectable;

    #[derive(Debug)]
    struct TestError;

    impl Display for TestError {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            write!(f, "test error")
        }
    }

    impl std::error::Error for TestError {}

    #[derive(Injectable, Default)]
    #[injectable(init)]
    struct InitializableStruct {
        initialized: AtomicUsize,
    }

    impl Initializer for InitializableStruct {
        fn init(&self) -> Result<(), ErrorPtr> {
            self.initialized.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[derive(Injectable, Default)]
    #[injectable(init)]
    struct FailingInitializer;

    impl Initializer for FailingInitializer {
        fn init(&self) -> Result<(), ErrorPtr> {
            Err(Arc::new(TestError) as ErrorPtr)
        }
    }

    #[derive(Injectable, Default)]
    #[injectable(clean)]
    struct StoppableStruct {
        fail: bool,
        stopped: AtomicUsize,
    }

    impl Cleaner for StoppableStruct {
        fn clean(&self) -> Result<(), ErrorPtr> {
            self.stopped.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(Arc::new(TestError) as ErrorPtr)
            } else {
                Ok(())
            }
        }
    }

    #[derive(Injectable, Default)]
    struct Aaa;

    #[derive(Injectable, Default)]
    struct Bbb {
        aaa: Inject<Aaa>,
    }

    #[derive(Injectable, Default)]
    struct NamedBbb {
        #[inject(name = "aaa")]
        aaa: Inject<Aaa>,
    }

    #[derive(Injectable, Default)]
    struct UnknownNamedBbb {
        #[inject(name = "unknown_aaa")]
        aaa: Inject<Aaa>,
    }

    #[derive(Injectable, Default)]
    #[injectable(init)]
    struct ImplicitDependency {
        initialized: AtomicUsize,
    }

    impl Initializer for ImplicitDependency {
        fn init(&self) -> Result<(), ErrorPtr> {
            self.initialized.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[derive(Injectable, Default)]
    struct ImplicitBbb {
        #[inject(implicit)]
        dependency: Inject<ImplicitDependency>,
        aaa: Inject<Aaa>,
    }

    #[derive(Injectable, Default)]
    struct PlainBbb {
        dependency: Inject<ImplicitDependency>,
    }

    #[derive(Injectable, Default)]
    struct TupleBbb(Inject<Aaa>, #[inject(name = "aaa")] Inject<Aaa>);

    #[derive(Injectable)]
    struct GenericBbb<T: Send + Sync + 'static> {
        aaa: Inject<Aaa>,
        value: T,
    }

    // records initialization order shared between objects
    #[derive(Injectable)]
    #[injectable(init)]
    struct Recorder {
        id: usize,
        log: Arc<Mutex<Vec<usize>>>,
    }

    impl Initializer for Recorder {
        fn init(&self) -> Result<(), ErrorPtr> {
            self.log.lock().unwrap().push(self.id);
            Ok(())
        }
    }

    #[test]
    fn should_initialize_simple_object() {
        let object = Arc::new(InitializableStruct::default());

        Container::new()
            .with_object(object.clone())
            .unwrap()
            .initialize_graph()
            .unwrap();

        assert_eq!(object.initialized.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn should_inject_unnamed_dependency() {
        let aaa = Arc::new(Aaa);
        let bbb = Arc::new(Bbb::default());

        Container::new()
            .with_objects([Entry::from(aaa.clone()), Entry::from(bbb.clone())])
            .unwrap()
            .initialize_graph()
            .unwrap();

        assert!(Arc::ptr_eq(bbb.aaa.get().unwrap(), &aaa));
    }

    #[test]
    fn should_stop_objects() {
        let object = Arc::new(StoppableStruct::default());

        let container = Container::new()
            .with_objects([Entry::from(object.clone())])
            .unwrap()
            .initialize_graph()
            .unwrap();

        container.stop();
        container.stop();

        assert_eq!(object.stopped.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn should_stop_with_guard() {
        let object = Arc::new(StoppableStruct::default());

        let container = Container::new()
            .with_object(object.clone())
            .unwrap()
            .initialize_graph()
            .unwrap();

        {
            let _guard = container.stop_guard();
            assert_eq!(object.stopped.load(Ordering::SeqCst), 0);
        }

        assert_eq!(object.stopped.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn should_clean_all_objects_despite_errors() {
        let failing = Arc::new(StoppableStruct {
            fail: true,
            ..Default::default()
        });
        let working = Arc::new(StoppableStruct::default());

        let container = Container::new()
            .with_object(failing.clone())
            .unwrap()
            .with_object(working.clone())
            .unwrap()
            .initialize_graph()
            .unwrap();

        container.stop();

        assert_eq!(failing.stopped.load(Ordering::SeqCst), 1);
        assert_eq!(working.stopped.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn should_inject_named_dependency() {
        let aaa = Arc::new(Aaa);
        let bbb = Arc::new(NamedBbb::default());

        let container = Container::new()
            .with_named_object("aaa", aaa.clone())
            .unwrap()
            .with_object(bbb.clone())
            .unwrap()
            .initialize_graph()
            .unwrap();

        assert!(Arc::ptr_eq(bbb.aaa.get().unwrap(), &aaa));
        assert!(Arc::ptr_eq(
            &container.get_named_object::<Aaa>("aaa").unwrap(),
            &aaa
        ));
        assert!(container.get_object::<Aaa>().is_err());
    }

    #[test]
    fn should_reject_unknown_name() {
        let error = Container::new()
            .with_named_object("aaa", Arc::new(Aaa))
            .unwrap()
            .with_object(Arc::new(UnknownNamedBbb::default()))
            .unwrap()
            .initialize_graph()
            .unwrap_err();

        assert!(matches!(
            error,
            ContainerError::Population(ResolverError::UnresolvedName { name, type_name })
                if name == "unknown_aaa" && type_name.ends_with("Aaa")
        ));
    }

    #[test]
    fn should_reject_duplicate_name() {
        let object = Arc::new(InitializableStruct::default());

        let error = Container::new()
            .with_named_object("aaa", Arc::new(Aaa))
            .unwrap()
            .with_named_object("aaa", object.clone())
            .unwrap_err();

        assert!(matches!(
            error,
            ContainerError::Registration {
                source: ResolverError::DuplicateName(..),
                ..
            }
        ));
        assert_eq!(object.initialized.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn should_reject_implicit_objects_in_strict_mode() {
        let error = Container::new()
            .with_object(Arc::new(Aaa))
            .unwrap()
            .with_object(Arc::new(ImplicitBbb::default()))
            .unwrap()
            .initialize_graph()
            .unwrap_err();

        assert!(matches!(
            error,
            ContainerError::ImplicitObject { type_name } if type_name.ends_with("ImplicitDependency")
        ));
    }

    #[test]
    fn should_accept_implicit_objects_in_relaxed_mode() {
        let bbb = Arc::new(ImplicitBbb::default());

        let container = Container::new()
            .with_object(Arc::new(Aaa))
            .unwrap()
            .with_object(bbb.clone())
            .unwrap()
            .initialize_graph_with_implicit_objects()
            .unwrap();

        let dependency = bbb.dependency.get().unwrap();
        assert_eq!(container.implicit_objects().len(), 1);
        assert!(container.get_object::<ImplicitDependency>().is_err());
        // implicit objects are wired, but only registered objects are initialized
        assert_eq!(dependency.initialized.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn should_wire_implicit_objects_regardless_of_order() {
        let plain = Arc::new(PlainBbb::default());
        let implicit = Arc::new(ImplicitBbb::default());

        Container::new()
            .with_object(plain.clone())
            .unwrap()
            .with_object(Arc::new(Aaa))
            .unwrap()
            .with_object(implicit.clone())
            .unwrap()
            .initialize_graph_with_implicit_objects()
            .unwrap();

        assert!(Arc::ptr_eq(
            plain.dependency.get().unwrap(),
            implicit.dependency.get().unwrap()
        ));
    }

    #[test]
    fn should_follow_configured_strictness() {
        let bbb = Arc::new(ImplicitBbb::default());

        Container::new()
            .with_strict(false)
            .with_object(Arc::new(Aaa))
            .unwrap()
            .with_object(bbb.clone())
            .unwrap()
            .initialize()
            .unwrap();

        assert!(bbb.dependency.is_injected());
    }

    #[test]
    fn should_report_initialization_error() {
        let later = Arc::new(InitializableStruct::default());

        let error = Container::new()
            .with_object(Arc::new(FailingInitializer))
            .unwrap()
            .with_object(later.clone())
            .unwrap()
            .initialize_graph()
            .unwrap_err();

        assert!(matches!(
            error,
            ContainerError::Initialization { type_name, .. } if type_name.ends_with("FailingInitializer")
        ));
        assert_eq!(later.initialized.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn should_report_constructor_error() {
        let result: Result<Arc<Aaa>, TestError> = Err(TestError);

        assert!(matches!(
            Container::new().with_object_or_err(result).unwrap_err(),
            ContainerError::Constructor(..)
        ));
    }

    #[test]
    fn should_initialize_batches_in_order() {
        let log = Arc::new(Mutex::new(vec![]));
        let recorder = |id| {
            Arc::new(Recorder {
                id,
                log: log.clone(),
            })
        };

        Container::new()
            .with_object(recorder(0))
            .unwrap()
            .init_sync()
            .with_object(recorder(1))
            .unwrap()
            .with_object(recorder(2))
            .unwrap()
            .init_async()
            .with_object(recorder(3))
            .unwrap()
            .initialize_graph()
            .unwrap();

        let log = log.lock().unwrap();
        assert_eq!(log.len(), 4);
        assert_eq!(log[0], 0);
        assert!(log[1..3].contains(&1) && log[1..3].contains(&2));
        assert_eq!(log[3], 3);
    }

    #[test]
    fn should_wire_tuple_and_generic_structs() {
        let unnamed = Arc::new(Aaa);
        let named = Arc::new(Aaa);
        let tuple = Arc::new(TupleBbb::default());
        let generic = Arc::new(GenericBbb {
            aaa: Inject::new(),
            value: 5,
        });

        Container::new()
            .with_object(unnamed.clone())
            .unwrap()
            .with_named_object("aaa", named.clone())
            .unwrap()
            .with_object(tuple.clone())
            .unwrap()
            .with_object(generic.clone())
            .unwrap()
            .initialize_graph()
            .unwrap();

        assert!(Arc::ptr_eq(tuple.0.get().unwrap(), &unnamed));
        assert!(Arc::ptr_eq(tuple.1.get().unwrap(), &named));
        assert!(Arc::ptr_eq(generic.aaa.get().unwrap(), &unnamed));
        assert_eq!(generic.value, 5);
    }

    #[test]
    fn should_list_all_objects() {
        let container = Container::new_debug()
            .with_object(Arc::new(Aaa))
            .unwrap()
            .with_object(Arc::new(Bbb::default()))
            .unwrap()
            .initialize_graph()
            .unwrap();

        assert_eq!(container.all_objects().len(), 2);
        assert!(container.implicit_objects().is_empty());
    }
}
