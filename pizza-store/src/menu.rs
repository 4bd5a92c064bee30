use crate::console::Console;
use crate::model::DaoError;

use std::io;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Flow {
    Continue,
    Exit,
}

pub type Action<C> = fn(&mut C, &mut Console) -> Result<Flow, DaoError>;

enum Line<C> {
    Entry {
        code: i32,
        label: &'static str,
        action: Action<C>,
    },
    Rule,
}

pub struct Menu<C> {
    title: &'static str,
    lines: Vec<Line<C>>,
}

impl<C> Menu<C> {
    pub fn new(title: &'static str) -> Menu<C> {
        Menu {
            title,
            lines: vec![],
        }
    }

    pub fn entry(mut self, code: i32, label: &'static str, action: Action<C>) -> Menu<C> {
        self.lines.push(Line::Entry {
            code,
            label,
            action,
        });
        self
    }

    pub fn rule(mut self) -> Menu<C> {
        self.lines.push(Line::Rule);
        self
    }

    pub fn lookup(&self, choice: i32) -> Option<Action<C>> {
        self.lines.iter().find_map(|line| match line {
            Line::Entry { code, action, .. } if *code == choice => Some(*action),
            _ => None,
        })
    }

    pub fn render(&self, console: &mut Console) -> io::Result<()> {
        console.say(self.title)?;
        console.say(&"-".repeat(self.title.len()))?;
        for line in self.lines.iter() {
            match line {
                Line::Entry { code, label, .. } => console.say(&format!("{}. {}", code, label))?,
                Line::Rule => console.say(".........................")?,
            }
        }
        Ok(())
    }

    pub fn run(&self, ctx: &mut C, console: &mut Console) -> io::Result<()> {
        loop {
            self.render(console)?;

            let choice = match console.read_choice() {
                Ok(v) => v,
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    debug!("input closed, leaving {}", self.title);
                    return Ok(());
                }
                Err(e) => return Err(e),
            };

            let action = match self.lookup(choice) {
                Some(v) => v,
                None => {
                    console.say("Unrecognized choice!")?;
                    continue;
                }
            };

            debug!("{}: dispatching choice {}", self.title, choice);
            match action(ctx, console) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => return Ok(()),
                Err(e) if e.is_end_of_input() => return Ok(()),
                Err(e) => {
                    debug!("{}: choice {} failed: {}", self.title, choice, e);
                    console.report(&e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::testing::scripted;
    use crate::model::DataError;

    use log::{Level, LevelFilter, Log, Metadata, Record};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts warnings and errors logged from this module.
    struct LoudRecords(AtomicUsize);

    impl Log for LoudRecords {
        fn enabled(&self, _: &Metadata) -> bool {
            true
        }

        fn log(&self, record: &Record) {
            if record.level() <= Level::Warn && record.target().ends_with("::menu") {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        fn flush(&self) {}
    }

    static LOUD_RECORDS: LoudRecords = LoudRecords(AtomicUsize::new(0));

    #[derive(Default)]
    struct Counter {
        hits: u32,
        failures: u32,
    }

    fn hit(ctx: &mut Counter, _: &mut Console) -> Result<Flow, DaoError> {
        ctx.hits += 1;
        Ok(Flow::Continue)
    }

    fn fail(ctx: &mut Counter, _: &mut Console) -> Result<Flow, DaoError> {
        ctx.failures += 1;
        Err(DaoError::from(DataError::NotAuthorizedErr))
    }

    fn leave(_: &mut Counter, _: &mut Console) -> Result<Flow, DaoError> {
        Ok(Flow::Exit)
    }

    fn menu() -> Menu<Counter> {
        Menu::new("TEST MENU")
            .entry(1, "Hit", hit)
            .entry(2, "Fail", fail)
            .rule()
            .entry(9, "Leave", leave)
    }

    #[test]
    fn renders_title_underline_and_entries() {
        let (mut console, output) = scripted("");
        menu().render(&mut console).unwrap();

        assert_eq!(
            output.contents(),
            "TEST MENU\n---------\n1. Hit\n2. Fail\n.........................\n9. Leave\n"
        );
    }

    #[test]
    fn dispatches_until_exit() {
        let (mut console, _) = scripted("1\n1\n9\n1\n");
        let mut ctx = Counter::default();

        menu().run(&mut ctx, &mut console).unwrap();

        assert_eq!(ctx.hits, 2);
    }

    #[test]
    fn unknown_and_invalid_choices_redisplay_the_menu() {
        let (mut console, output) = scripted("42\nseven\n-1\n1\n9\n");
        let mut ctx = Counter::default();

        menu().run(&mut ctx, &mut console).unwrap();

        let text = output.contents();
        assert_eq!(ctx.hits, 1);
        assert_eq!(text.matches("Unrecognized choice!").count(), 2);
        assert_eq!(text.matches("Your input is invalid!").count(), 1);
        assert_eq!(text.matches("TEST MENU").count(), 4);
    }

    #[test]
    fn failed_actions_do_not_stop_the_loop() {
        let (mut console, _) = scripted("2\n2\n1\n9\n");
        let mut ctx = Counter::default();

        menu().run(&mut ctx, &mut console).unwrap();

        assert_eq!(ctx.failures, 2);
        assert_eq!(ctx.hits, 1);
    }

    #[test]
    fn failed_actions_are_reported_once_not_logged_as_warnings() {
        let _ = log::set_logger(&LOUD_RECORDS);
        log::set_max_level(LevelFilter::Debug);
        let (mut console, _) = scripted("2\n9\n");
        let mut ctx = Counter::default();

        menu().run(&mut ctx, &mut console).unwrap();

        assert_eq!(ctx.failures, 1);
        assert_eq!(LOUD_RECORDS.0.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn closed_input_ends_the_loop() {
        let (mut console, _) = scripted("1\n");
        let mut ctx = Counter::default();

        menu().run(&mut ctx, &mut console).unwrap();

        assert_eq!(ctx.hits, 1);
    }

    #[test]
    fn lookup_ignores_rules() {
        let menu = menu();

        assert!(menu.lookup(1).is_some());
        assert!(menu.lookup(3).is_none());
        assert!(menu.lookup(0).is_none());
    }
}
