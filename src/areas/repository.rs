use crate::areas::cache::Cache;
use crate::areas::config::Config;
use crate::areas::history::History;
use crate::areas::resolver::Resolver;
use std::cell::{RefCell, RefMut};
use std::io::Write;

pub struct Repository {
    config: Config,
    writer: RefCell<Box<dyn Write>>,
    history: History,
    cache: Cache,
}

impl Repository {
    pub fn new(config: Config, writer: Box<dyn Write>) -> Self {
        let history = History::new(config.root().to_path_buf());
        let cache = Cache::new(config.cache_dir().to_path_buf());

        Repository {
            config,
            writer: RefCell::new(writer),
            history,
            cache,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn Write>> {
        self.writer.borrow_mut()
    }

    pub fn resolver(&'_ self) -> Resolver<'_> {
        Resolver::new(&self.config, &self.history, &self.cache)
    }
}
