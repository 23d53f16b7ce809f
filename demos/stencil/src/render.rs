//! Turning a compiled linker into text.

use log::trace;
use scankit::{Entry, Link, Linker};

use crate::{Piece, StencilError};

/// Concatenates a compiled stencil into a string.
///
/// Outside `{? ... ?}` every variable must have a value. Inside, a missing
/// variable makes the whole optional section render as nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Render;

impl Link<Piece> for Render {
    type Output = String;
    type Error = StencilError;

    fn link(&self, linker: &Linker<Piece>) -> Result<String, StencilError> {
        let mut out = String::new();
        render(linker.entries(), &mut out)?;
        Ok(out)
    }
}

fn render(entries: &[Entry<Piece>], out: &mut String) -> Result<(), StencilError> {
    let mut entries = entries.iter().peekable();
    while let Some(entry) = entries.next() {
        let piece = match entry {
            Entry::Item(piece) => piece,
            Entry::Child(child) => {
                render(child.entries(), out)?;
                continue;
            }
        };
        // the pieces of a block's nested tags, if it had any
        let nested = entries.next_if(|next| matches!(next, Entry::Child(_)));
        let body = |fallback: &str| -> Result<String, StencilError> {
            match nested {
                Some(Entry::Child(child)) => {
                    let mut text = String::new();
                    render(child.entries(), &mut text)?;
                    Ok(text)
                }
                _ => Ok(fallback.to_string()),
            }
        };

        match piece {
            Piece::Text(text) => out.push_str(text),
            Piece::Value { name, value } => match value {
                Some(value) => out.push_str(value),
                None => return Err(StencilError::MissingArgument(name.clone())),
            },
            Piece::Filter { filter, body: text } => out.push_str(&filter.apply(&body(text.as_str())?)),
            Piece::Optional { body: text } => match body(text.as_str()) {
                Ok(text) => out.push_str(&text),
                Err(StencilError::MissingArgument(name)) => {
                    trace!("optional section dropped, `{name}` is not set");
                }
                Err(err) => return Err(err),
            },
            Piece::Raw(data) => out.push_str(&data.content),
        }
    }
    Ok(())
}
