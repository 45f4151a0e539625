use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use wiring::{
    Argument, DiError, Lifetime, Param, ServiceCollection, ServiceContainer, ServiceDefinition, ServiceType,
};

struct Logger {
    lines: Mutex<Vec<String>>,
}

impl Logger {
    fn info(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }
}

struct MessageGenerator {
    logger: Arc<Logger>,
}

impl MessageGenerator {
    fn happy_message(&self) -> &'static str {
        self.logger.info("About to generate a message");
        "You did it! You updated the system! Amazing!"
    }
}

/// Registers logger and message_generator, counting constructions.
fn scenario(builds: &Arc<AtomicUsize>) -> ServiceContainer {
    let logger_builds = builds.clone();
    let logger = ServiceType::of::<Logger>().construct(move |_| {
        logger_builds.fetch_add(1, Ordering::SeqCst);
        Ok(Logger { lines: Mutex::new(Vec::new()) })
    });
    let generator_builds = builds.clone();
    let generator = ServiceType::of::<MessageGenerator>()
        .param(Param::of::<Logger>("logger"))
        .construct(move |args| {
            generator_builds.fetch_add(1, Ordering::SeqCst);
            Ok(MessageGenerator { logger: args.service("logger")? })
        });

    let mut services = ServiceCollection::new();
    services
        .register(ServiceDefinition::new("logger", logger))
        .unwrap()
        .register(ServiceDefinition::new("message_generator", generator).autowire(true))
        .unwrap();
    services.build().unwrap()
}

#[test]
fn test_logger_message_generator_scenario() {
    let builds = Arc::new(AtomicUsize::new(0));
    let container = scenario(&builds);

    let generator = container.get::<MessageGenerator>("message_generator").unwrap();
    assert_eq!(generator.happy_message(), "You did it! You updated the system! Amazing!");
    assert_eq!(builds.load(Ordering::SeqCst), 2); // one Logger, one MessageGenerator

    let again = container.get::<MessageGenerator>("message_generator").unwrap();
    assert!(Arc::ptr_eq(&generator, &again));
    assert_eq!(builds.load(Ordering::SeqCst), 2); // second get builds nothing

    let logger = container.get::<Logger>("logger").unwrap();
    assert!(Arc::ptr_eq(&generator.logger, &logger));
    assert_eq!(logger.lines.lock().unwrap().len(), 1);
}

#[test]
fn test_registering_and_listing_construct_nothing() {
    let builds = Arc::new(AtomicUsize::new(0));
    let container = scenario(&builds);

    let listed = container.list_all();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, "logger");
    assert_eq!(listed[1].id, "message_generator");
    assert!(listed[1].type_name.ends_with("MessageGenerator"));
    assert!(listed[1].autowire);

    assert!(container.has("logger"));
    assert!(!container.has("Logger"));
    assert!(!container.is_initialized("logger"));
    assert_eq!(builds.load(Ordering::SeqCst), 0);
}

#[test]
fn test_transitive_singleton_identity() {
    struct Cache;
    struct Repository {
        cache: Arc<Cache>,
    }
    struct Service {
        repository: Arc<Repository>,
        cache: Arc<Cache>,
    }

    let cache = ServiceType::of::<Cache>().construct(|_| Ok(Cache));
    let repository = ServiceType::of::<Repository>()
        .param(Param::of::<Cache>("cache"))
        .construct(|args| Ok(Repository { cache: args.service("cache")? }));
    let service = ServiceType::of::<Service>()
        .param(Param::of::<Repository>("repository"))
        .param(Param::of::<Cache>("cache"))
        .construct(|args| {
            Ok(Service {
                repository: args.service("repository")?,
                cache: args.service("cache")?,
            })
        });

    let mut services = ServiceCollection::new();
    services.register(ServiceDefinition::new("cache", cache)).unwrap();
    services.register(ServiceDefinition::new("repository", repository).autowire(true)).unwrap();
    services.register(ServiceDefinition::new("service", service).autowire(true)).unwrap();
    let container = services.build().unwrap();

    let service = container.get::<Service>("service").unwrap();
    assert!(Arc::ptr_eq(&service.cache, &service.repository.cache));
    assert!(Arc::ptr_eq(&service.cache, &container.get::<Cache>("cache").unwrap()));
}

#[test]
fn test_transient_creates_new_instances() {
    let counter = Arc::new(AtomicUsize::new(0));
    let counter_clone = counter.clone();
    struct RequestId(usize);

    let request_id = ServiceType::of::<RequestId>()
        .construct(move |_| Ok(RequestId(counter_clone.fetch_add(1, Ordering::SeqCst))));

    let mut services = ServiceCollection::new();
    services
        .register(ServiceDefinition::new("request_id", request_id).with_lifetime(Lifetime::Transient))
        .unwrap();
    let container = services.build().unwrap();

    let first = container.get::<RequestId>("request_id").unwrap();
    let second = container.get::<RequestId>("request_id").unwrap();
    assert_eq!((first.0, second.0), (0, 1));
    assert!(!container.is_initialized("request_id"));
}

#[test]
fn test_explicit_service_reference() {
    struct Transport(&'static str);
    struct Mailer {
        transport: Arc<Transport>,
    }

    let smtp = ServiceType::of::<Transport>().construct(|_| Ok(Transport("smtp")));
    let sendmail = ServiceType::of::<Transport>().construct(|_| Ok(Transport("sendmail")));
    let mailer = ServiceType::of::<Mailer>()
        .param(Param::of::<Transport>("transport"))
        .construct(|args| Ok(Mailer { transport: args.service("transport")? }));

    let mut services = ServiceCollection::new();
    services.register(ServiceDefinition::new("smtp", smtp)).unwrap();
    services.register(ServiceDefinition::new("sendmail", sendmail)).unwrap();
    services
        .register(ServiceDefinition::new("mailer", mailer).arg("transport", Argument::service("sendmail")))
        .unwrap();
    let container = services.build().unwrap();

    let mailer = container.get::<Mailer>("mailer").unwrap();
    assert_eq!(mailer.transport.0, "sendmail");
}

#[test]
fn test_aliases_share_the_target_instance() {
    struct Mailer;

    let mut services = ServiceCollection::new();
    services
        .register(ServiceDefinition::new("app.mailer", ServiceType::of::<Mailer>().construct(|_| Ok(Mailer))))
        .unwrap()
        .alias("mailer", "app.mailer")
        .unwrap()
        .alias("notifier", "mailer")
        .unwrap();
    let container = services.build().unwrap();

    let direct = container.get::<Mailer>("app.mailer").unwrap();
    assert!(Arc::ptr_eq(&direct, &container.get::<Mailer>("mailer").unwrap()));
    assert!(Arc::ptr_eq(&direct, &container.get::<Mailer>("notifier").unwrap()));
    assert_eq!(container.list_all()[0].aliases, vec!["mailer"]);
    assert_eq!(container.definition("notifier").unwrap().id(), "app.mailer");
}

#[test]
fn test_alias_to_unknown_service() {
    let mut services = ServiceCollection::new();
    services.alias("mailer", "app.mailer").unwrap();
    let container = services.build().unwrap();

    assert!(!container.has("mailer"));
    match container.get_any("mailer") {
        Err(DiError::UnknownService { id, .. }) => assert_eq!(id, "app.mailer"),
        other => panic!("expected UnknownService, got {:?}", other.err()),
    }
}

#[test]
fn test_duplicate_ids_are_rejected() {
    struct Clock;
    let clock = ServiceType::of::<Clock>().construct(|_| Ok(Clock));

    let mut services = ServiceCollection::new();
    services.register(ServiceDefinition::new("clock", clock.clone())).unwrap();
    assert!(matches!(
        services.register(ServiceDefinition::new("clock", clock.clone())),
        Err(DiError::DuplicateId(id)) if id == "clock"
    ));
    assert!(matches!(services.alias("clock", "other"), Err(DiError::DuplicateId(_))));

    services.alias("time", "clock").unwrap();
    assert!(matches!(
        services.register(ServiceDefinition::new("time", clock)),
        Err(DiError::DuplicateId(_))
    ));
}

#[test]
fn test_tagged_services_are_injected_in_registration_order() {
    trait Handler: Send + Sync {
        fn name(&self) -> &'static str;
    }
    struct Audit;
    impl Handler for Audit {
        fn name(&self) -> &'static str {
            "audit"
        }
    }
    struct Mail;
    impl Handler for Mail {
        fn name(&self) -> &'static str {
            "mail"
        }
    }
    struct Dispatcher {
        handlers: Vec<Arc<dyn Handler>>,
    }

    let audit = ServiceType::of::<Audit>().implements::<dyn Handler>(|h| h).construct(|_| Ok(Audit));
    let mail = ServiceType::of::<Mail>().implements::<dyn Handler>(|h| h).construct(|_| Ok(Mail));
    let dispatcher = ServiceType::of::<Dispatcher>()
        .param(Param::of::<dyn Handler>("handlers"))
        .construct(|args| Ok(Dispatcher { handlers: args.capabilities("handlers")? }));

    let mut services = ServiceCollection::new();
    services.register(ServiceDefinition::new("mail", mail).tag("event_handler")).unwrap();
    services.register(ServiceDefinition::new("audit", audit).tag("event_handler")).unwrap();
    services
        .register(ServiceDefinition::new("dispatcher", dispatcher).arg("handlers", Argument::tagged("event_handler")))
        .unwrap();
    let container = services.build().unwrap();

    assert_eq!(container.tagged("event_handler"), vec!["mail", "audit"]);
    let dispatcher = container.get::<Dispatcher>("dispatcher").unwrap();
    let names: Vec<_> = dispatcher.handlers.iter().map(|h| h.name()).collect();
    assert_eq!(names, vec!["mail", "audit"]);

    let mail: Arc<dyn Handler> = container.get_capability("mail").unwrap();
    assert!(Arc::ptr_eq(&mail, &dispatcher.handlers[0]));
}

#[test]
fn test_get_with_wrong_type_is_a_mismatch() {
    struct Clock;
    let mut services = ServiceCollection::new();
    services
        .register(ServiceDefinition::new("clock", ServiceType::of::<Clock>().construct(|_| Ok(Clock))))
        .unwrap();
    let container = services.build().unwrap();

    assert!(matches!(container.get::<String>("clock"), Err(DiError::TypeMismatch { .. })));
    // The failed downcast still cached the clock
    assert!(container.is_initialized("clock"));
}

#[test]
fn test_constructor_failures_propagate_and_are_not_cached() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let attempts_clone = attempts.clone();
    struct Flaky;

    let flaky = ServiceType::of::<Flaky>().construct(move |args| {
        if attempts_clone.fetch_add(1, Ordering::SeqCst) == 0 {
            return Err(args.fail("not ready"));
        }
        Ok(Flaky)
    });

    let mut services = ServiceCollection::new();
    services.register(ServiceDefinition::new("flaky", flaky)).unwrap();
    let container = services.build().unwrap();

    match container.get::<Flaky>("flaky") {
        Err(DiError::Construction { service, message }) => {
            assert_eq!(service, "flaky");
            assert_eq!(message, "not ready");
        }
        other => panic!("expected Construction, got {:?}", other.err()),
    }
    assert!(!container.is_initialized("flaky"));
    assert!(container.get::<Flaky>("flaky").is_ok());
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}
