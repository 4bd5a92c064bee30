use std::fmt::Display;
use std::io::{self, BufRead, BufReader, Write};

/// Line-oriented terminal I/O shared by every menu and handler.
pub struct Console {
    input: Box<dyn BufRead>,
    output: Box<dyn Write>,
}

impl Console {
    pub fn new<R, W>(input: R, output: W) -> Console
    where
        R: BufRead + 'static,
        W: Write + 'static,
    {
        Console {
            input: Box::new(input),
            output: Box::new(output),
        }
    }

    pub fn stdio() -> Console {
        Console::new(BufReader::new(io::stdin()), io::stdout())
    }

    pub fn out(&mut self) -> &mut dyn Write {
        &mut *self.output
    }

    /// Closed input is reported as `UnexpectedEof` so loops can wind down.
    pub fn read_line(&mut self) -> io::Result<String> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }

        let trimmed = line.trim_end_matches(|c: char| c == '\n' || c == '\r').len();
        line.truncate(trimmed);
        Ok(line)
    }

    pub fn prompt(&mut self, label: &str) -> io::Result<String> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;
        self.read_line()
    }

    pub fn say(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.output, "{}", line)
    }

    /// Keeps asking until a whole number is entered.
    pub fn read_choice(&mut self) -> io::Result<i32> {
        loop {
            let line = self.prompt("Please make your choice: ")?;
            match line.trim().parse::<i32>() {
                Ok(choice) => return Ok(choice),
                Err(_) => self.say("Your input is invalid!")?,
            }
        }
    }

    pub fn report(&mut self, err: &dyn Display) {
        let _ = self.output.flush();
        eprintln!("{}", err);
    }
}

#[cfg(test)]
pub mod testing {
    use super::Console;
    use std::cell::RefCell;
    use std::io::{self, Cursor, Write};
    use std::rc::Rc;

    #[derive(Clone, Default)]
    pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

    impl SharedBuffer {
        pub fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.borrow()).into_owned()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// A console fed from `input` whose output can be inspected afterwards.
    pub fn scripted(input: &str) -> (Console, SharedBuffer) {
        let buffer = SharedBuffer::default();
        let console = Console::new(Cursor::new(input.as_bytes().to_vec()), buffer.clone());
        (console, buffer)
    }
}
