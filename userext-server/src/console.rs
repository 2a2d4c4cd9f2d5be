//! Output del comando su stdout, con gli stili error / warning / success.

use colored::Colorize;
use std::io::{self, IsTerminal, Write};

pub struct Console<W: Write> {
    out: W,
    color: bool,
}

impl Console<io::Stdout> {
    /// stdout del processo; colori solo se è un terminale.
    pub fn stdout() -> Self {
        let out = io::stdout();
        let color = out.is_terminal();
        Console { out, color }
    }
}

impl<W: Write> Console<W> {
    pub fn new(out: W, color: bool) -> Self {
        Console { out, color }
    }

    pub fn error(&mut self, msg: &str) -> io::Result<()> {
        let styled = if self.color { msg.red().bold().to_string() } else { msg.to_string() };
        writeln!(self.out, "{}", styled)
    }

    pub fn warning(&mut self, msg: &str) -> io::Result<()> {
        let styled = if self.color { msg.yellow().to_string() } else { msg.to_string() };
        writeln!(self.out, "{}", styled)
    }

    pub fn success(&mut self, msg: &str) -> io::Result<()> {
        let styled = if self.color { msg.green().to_string() } else { msg.to_string() };
        writeln!(self.out, "{}", styled)
    }

    pub fn line(&mut self, msg: &str) -> io::Result<()> {
        writeln!(self.out, "{}", msg)
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
