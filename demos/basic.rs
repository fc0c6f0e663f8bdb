//! Basic example of the rabita DI container.

use std::sync::Arc;

use rabita::prelude::*;

// === Define your traits and types ===

trait Logger: Send + Sync {
    fn log(&self, msg: &str);
}

struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, msg: &str) {
        println!("[LOG] {msg}");
    }
}

struct Config {
    database_url: String,
    debug: bool,
}

struct Database {
    url: Arc<String>,
    logger: Arc<Arc<dyn Logger>>,
}

impl Database {
    fn query(&self, sql: &str) -> String {
        self.logger.log(&format!("Executing: {sql}"));
        format!("Results from {}", self.url)
    }
}

impl Injectable for Database {
    fn metadata() -> ClassMetadata {
        ClassMetadata::new()
            .constructor_arg("config.database_url")
            .constructor_arg("logging.logger")
            .in_scope(BindingScope::Singleton)
    }

    fn construct(args: &mut ResolvedArguments<'_>) -> Result<Self> {
        Ok(Self {
            url: args.take(0)?,
            logger: args.take(1)?,
        })
    }
}

struct UserRepository {
    db: Arc<Database>,
}

impl UserRepository {
    fn find_user(&self, id: u64) -> String {
        self.db.query(&format!("SELECT * FROM users WHERE id = {id}"))
    }
}

impl Injectable for UserRepository {
    fn metadata() -> ClassMetadata {
        ClassMetadata::new().constructor_arg("datasources.db")
    }

    fn construct(args: &mut ResolvedArguments<'_>) -> Result<Self> {
        Ok(Self { db: args.take(0)? })
    }
}

struct UserService {
    repo: Arc<UserRepository>,
    logger: Arc<Arc<dyn Logger>>,
}

impl UserService {
    fn get_user(&self, id: u64) -> String {
        self.logger.log(&format!("Getting user {id}"));
        self.repo.find_user(id)
    }
}

impl Injectable for UserService {
    fn metadata() -> ClassMetadata {
        ClassMetadata::new()
            .constructor_arg("repositories.UserRepository")
            .constructor_arg("logging.logger")
    }

    fn construct(args: &mut ResolvedArguments<'_>) -> Result<Self> {
        Ok(Self {
            repo: args.take(0)?,
            logger: args.take(1)?,
        })
    }
}

fn main() -> Result<()> {
    // Initialize tracing (logging)
    tracing_subscriber::fmt()
        .with_env_filter("rabita=debug")
        .init();

    let container = Container::new();

    // Config — bound value
    container.bind("config").to_value(Config {
        database_url: "postgres://localhost/myapp".to_string(),
        debug: true,
    })?;

    // The database URL, derived from the config by a provider
    container.bind("config.database_url").to_provider(|ctx| {
        let config: Arc<Config> = ctx.resolve("config")?;
        Ok(config.database_url.clone())
    })?;

    // Logger — shared trait object
    container
        .bind("logging.logger")
        .to_value(Arc::new(ConsoleLogger) as Arc<dyn Logger>)?;

    // Classes — scope and injection sites come from their metadata
    container.bind("datasources.db").to_class::<Database>()?;
    container
        .bind("repositories.UserRepository")
        .to_class::<UserRepository>()?;
    container
        .bind("services.UserService")
        .to_class::<UserService>()?;

    println!("Container wired: {container:?}");

    let config: Arc<Config> = container.get("config")?;
    println!("Config: database_url={}, debug={}", config.database_url, config.debug);

    let service: Arc<UserService> = container.get("services.UserService")?;
    println!("{}", service.get_user(42));

    // The Database singleton is shared between resolutions
    let service2: Arc<UserService> = container.get("services.UserService")?;
    println!("{}", service2.get_user(7));

    Ok(())
}
