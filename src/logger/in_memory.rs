use super::Logger;

/// In memory logger, useful when testing and debugging.
#[derive(Default)]
pub struct InMemoryLogger {
    /// Every item logged so far, in order.
    pub values: Vec<String>,
}

impl<T> Logger<T> for InMemoryLogger
where
    T: std::fmt::Display,
{
    fn log(&mut self, item: T) {
        self.values.push(item.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_items_in_order() {
        let mut logger = InMemoryLogger::default();
        Logger::log(&mut logger, "a".to_string());
        Logger::log(&mut logger, "b".to_string());

        assert_eq!(logger.values, vec!["a", "b"]);
    }
}
