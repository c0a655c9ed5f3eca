//! Terminal render sink

use super::{RenderInstruction, RenderSink};
use crate::protocol::Product;
use crate::session::Role;
use crossterm::cursor::MoveToColumn;
use crossterm::queue;
use crossterm::style::{Print, Stylize};
use crossterm::terminal::{Clear, ClearType};
use std::io::{self, Stdout, Write};

const PENDING_TEXT: &str = "...";

/// Draws the transcript on a terminal (or any writer)
///
/// With styling enabled the pending indicator is erased in place; without it
/// a plain marker line is printed and left behind.
pub struct TerminalSink<W: Write + Send> {
    out: W,
    use_color: bool,
    pending_visible: bool,
}

impl TerminalSink<Stdout> {
    pub fn stdout(use_color: bool) -> Self {
        Self::new(io::stdout(), use_color)
    }
}

impl<W: Write + Send> TerminalSink<W> {
    pub fn new(out: W, use_color: bool) -> Self {
        Self {
            out,
            use_color,
            pending_visible: false,
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw(&mut self, instruction: RenderInstruction) -> io::Result<()> {
        match instruction {
            RenderInstruction::Message { role, text } => {
                let label = match role {
                    Role::User => "you",
                    Role::Bot => "bot",
                };
                if self.use_color {
                    queue!(self.out, Print(format!("{label}> ").cyan().bold()))?;
                } else {
                    write!(self.out, "{label}> ")?;
                }
                writeln!(self.out, "{}", sanitize(&text))?;
            }
            RenderInstruction::ProductList { products } => {
                for product in &products {
                    self.draw_product(product)?;
                }
            }
            RenderInstruction::OrderDetails {
                status,
                tracking_number,
            } => {
                self.draw_field("Order Status:", &status)?;
                if let Some(tracking) = tracking_number.filter(|t| !t.is_empty()) {
                    self.draw_field("Tracking Number:", &tracking)?;
                }
            }
            RenderInstruction::Error { text } => {
                let line = format!("! {}", sanitize(&text));
                if self.use_color {
                    queue!(self.out, Print(line.red()), Print("\n"))?;
                } else {
                    writeln!(self.out, "{line}")?;
                }
            }
            RenderInstruction::ShowPending => {
                self.pending_visible = true;
                if self.use_color {
                    queue!(self.out, Print(PENDING_TEXT.dim()))?;
                } else {
                    writeln!(self.out, "[waiting for reply]")?;
                }
            }
            RenderInstruction::HidePending => {
                if self.pending_visible && self.use_color {
                    queue!(self.out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
                }
                self.pending_visible = false;
            }
        }
        Ok(())
    }

    fn draw_product(&mut self, product: &Product) -> io::Result<()> {
        let title = sanitize(&product.title);
        let price = format!("${:.2}", product.price);
        if self.use_color {
            queue!(
                self.out,
                Print("  - "),
                Print(title),
                Print("  "),
                Print(price.green()),
                Print("\n")
            )
        } else {
            writeln!(self.out, "  - {title}  {price}")
        }
    }

    fn draw_field(&mut self, name: &str, value: &str) -> io::Result<()> {
        if self.use_color {
            queue!(self.out, Print(name.bold()))?;
        } else {
            write!(self.out, "{name}")?;
        }
        writeln!(self.out, " {}", sanitize(value))
    }

    /// Raised by every handler once the visible content has changed
    fn content_changed(&mut self) {
        let _ = self.out.flush();
    }
}

impl<W: Write + Send> RenderSink for TerminalSink<W> {
    fn render(&mut self, instruction: RenderInstruction) {
        if let Err(e) = self.draw(instruction) {
            tracing::debug!(error = %e, "Terminal write failed");
        }
        self.content_changed();
    }
}

/// Drop control characters so backend text cannot drive the terminal
fn sanitize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}
