//! Parser and formatter for assembly-qualified type names.
//!
//! Name handles carry types in the textual form the .NET runtime uses:
//!
//! ```text
//! Namespace.Outer+Inner`2[[Arg1, Assembly1],[Arg2, Assembly2]][][,], Assembly, Version=1.0.0.0, ...
//! ```
//!
//! - `+` separates nested type names
//! - a bracketed list after the name holds generic arguments; each argument is either
//!   wrapped in its own brackets (and then may be assembly-qualified) or a bare type name
//! - `[]` and `[,]` suffixes add array dimensions, outermost last
//! - everything after the first top-level comma is the assembly display name
//! - a backslash escapes one of the special characters `,+&*[]\` inside identifiers
//!
//! Pointer (`*`) and by-ref (`&`) types cannot appear in a serialization stream and are
//! rejected.
//!
//! # Examples
//!
//! ```rust
//! use dotwire::metadata::typesystem::TypeName;
//!
//! let text = "System.Collections.Generic.Dictionary`2[[System.String, mscorlib],[System.Int32, mscorlib]], mscorlib";
//! let name = TypeName::parse(text)?;
//! assert_eq!(name.definition_name(), "System.Collections.Generic.Dictionary`2");
//! assert_eq!(name.generic_args.len(), 2);
//! assert_eq!(name.assembly.as_deref(), Some("mscorlib"));
//! assert_eq!(name.to_string(), text);
//! # Ok::<(), dotwire::Error>(())
//! ```

use std::fmt;

use crate::Result;

/// Characters that must be escaped inside identifiers
const SPECIAL_CHARS: &[char] = &[',', '+', '&', '*', '[', ']', '\\'];

/// A parsed, structured type name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypeName {
    /// Namespace of the outermost type; may be empty
    pub namespace: String,
    /// Outermost type name followed by each nested type name
    pub nested: Vec<String>,
    /// Generic arguments, in order
    pub generic_args: Vec<TypeName>,
    /// Array ranks applied to the type, innermost first
    pub array_ranks: Vec<u32>,
    /// Raw assembly display name, if the name is assembly-qualified
    pub assembly: Option<String>,
}

impl TypeName {
    /// Parse an (optionally assembly-qualified) type name.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the text is empty, unbalanced, names a pointer or
    /// by-ref type, or has trailing characters.
    pub fn parse(text: &str) -> Result<Self> {
        let mut parser = TypeNameParser::new(text);
        let type_name = parser.parse_qualified(false)?;
        if let Some(c) = parser.peek() {
            return Err(malformed_error!(
                "Unexpected '{}' at offset {} in type name '{}'",
                c,
                parser.pos,
                text
            ));
        }
        Ok(type_name)
    }

    /// The `Namespace.Outer+Inner` path without generic arguments, arrays or assembly
    #[must_use]
    pub fn definition_name(&self) -> String {
        let mut result = String::new();
        self.write_definition(&mut result, false);
        result
    }

    /// The full name: everything except the top-level assembly qualification
    #[must_use]
    pub fn full_name(&self) -> String {
        let mut result = String::new();
        self.write_full(&mut result);
        result
    }

    /// Rewrites every assembly display name in this name and its generic arguments.
    ///
    /// `rewrite` receives each display name and returns a replacement, or `None` to keep it.
    pub fn map_assemblies<F>(&mut self, rewrite: &mut F)
    where
        F: FnMut(&str) -> Option<String>,
    {
        if let Some(assembly) = &self.assembly {
            if let Some(replacement) = rewrite(assembly) {
                self.assembly = Some(replacement);
            }
        }
        for arg in &mut self.generic_args {
            arg.map_assemblies(rewrite);
        }
    }

    fn write_definition(&self, out: &mut String, escape: bool) {
        if !self.namespace.is_empty() {
            push_identifier(out, &self.namespace, escape);
            out.push('.');
        }
        for (i, name) in self.nested.iter().enumerate() {
            if i > 0 {
                out.push('+');
            }
            push_identifier(out, name, escape);
        }
    }

    fn write_full(&self, out: &mut String) {
        self.write_definition(out, true);

        if !self.generic_args.is_empty() {
            out.push('[');
            for (i, arg) in self.generic_args.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                if arg.assembly.is_some() {
                    out.push('[');
                    arg.write_qualified(out);
                    out.push(']');
                } else {
                    arg.write_full(out);
                }
            }
            out.push(']');
        }

        for rank in &self.array_ranks {
            out.push('[');
            for _ in 1..*rank {
                out.push(',');
            }
            out.push(']');
        }
    }

    fn write_qualified(&self, out: &mut String) {
        self.write_full(out);
        if let Some(assembly) = &self.assembly {
            out.push_str(", ");
            out.push_str(assembly);
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut result = String::new();
        self.write_qualified(&mut result);
        f.write_str(&result)
    }
}

fn push_identifier(out: &mut String, identifier: &str, escape: bool) {
    for c in identifier.chars() {
        if escape && SPECIAL_CHARS.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
}

/// Recursive descent parser over the characters of a type name
struct TypeNameParser<'a> {
    text: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> TypeNameParser<'a> {
    fn new(text: &'a str) -> Self {
        TypeNameParser {
            text,
            chars: text.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(c) => Err(malformed_error!(
                "Expected '{}' but found '{}' at offset {} in type name '{}'",
                expected,
                c,
                self.pos,
                self.text
            )),
            None => Err(malformed_error!(
                "Expected '{}' but reached the end of type name '{}'",
                expected,
                self.text
            )),
        }
    }

    /// type-name [ ',' assembly ]
    fn parse_qualified(&mut self, bracketed: bool) -> Result<TypeName> {
        let mut type_name = self.parse_type()?;

        self.skip_whitespace();
        if self.peek() == Some(',') {
            self.pos += 1;
            let assembly = self.read_assembly(bracketed);
            if assembly.is_empty() {
                return Err(malformed_error!(
                    "Empty assembly name in type name '{}'",
                    self.text
                ));
            }
            type_name.assembly = Some(assembly);
        }

        Ok(type_name)
    }

    /// identifier ('+' identifier)* [ generic-args ] array-suffix*
    fn parse_type(&mut self) -> Result<TypeName> {
        let path = self.read_identifier()?;
        let (namespace, name) = match path.rfind('.') {
            Some(split) => (path[..split].to_string(), path[split + 1..].to_string()),
            None => (String::new(), path),
        };
        if name.is_empty() {
            return Err(malformed_error!(
                "Type name ends with a namespace separator in '{}'",
                self.text
            ));
        }

        let mut type_name = TypeName {
            namespace,
            nested: vec![name],
            ..TypeName::default()
        };

        while self.peek() == Some('+') {
            self.pos += 1;
            type_name.nested.push(self.read_identifier()?);
        }

        if self.peek() == Some('[') && !matches!(self.peek_at(1), Some(']' | ',' | '*')) {
            self.pos += 1;
            loop {
                self.skip_whitespace();
                let arg = if self.peek() == Some('[') {
                    self.pos += 1;
                    let arg = self.parse_qualified(true)?;
                    self.expect(']')?;
                    arg
                } else {
                    self.parse_type()?
                };
                type_name.generic_args.push(arg);

                self.skip_whitespace();
                match self.peek() {
                    Some(',') => self.pos += 1,
                    _ => {
                        self.expect(']')?;
                        break;
                    }
                }
            }
        }

        while self.peek() == Some('[') {
            self.pos += 1;
            if self.peek() == Some('*') {
                // `T[*]` is a rank-1 multidimensional array, distinct from the vector `T[]`
                return Err(malformed_error!(
                    "Non-vector rank-1 arrays cannot be serialized: '{}'",
                    self.text
                ));
            }

            let mut rank = 1;
            while self.peek() == Some(',') {
                rank += 1;
                self.pos += 1;
            }
            self.expect(']')?;
            type_name.array_ranks.push(rank);
        }

        if let Some(c @ ('*' | '&')) = self.peek() {
            return Err(malformed_error!(
                "Pointer and by-ref types ('{}') cannot be serialized: '{}'",
                c,
                self.text
            ));
        }

        Ok(type_name)
    }

    fn read_identifier(&mut self) -> Result<String> {
        self.skip_whitespace();

        let mut identifier = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' {
                self.pos += 1;
                match self.peek() {
                    Some(escaped) => identifier.push(escaped),
                    None => {
                        return Err(malformed_error!(
                            "Dangling escape at the end of type name '{}'",
                            self.text
                        ))
                    }
                }
            } else if SPECIAL_CHARS.contains(&c) {
                break;
            } else {
                identifier.push(c);
            }
            self.pos += 1;
        }

        let trimmed = identifier.trim_end();
        if trimmed.is_empty() {
            return Err(malformed_error!(
                "Missing identifier at offset {} in type name '{}'",
                self.pos,
                self.text
            ));
        }
        Ok(trimmed.to_string())
    }

    fn read_assembly(&mut self, bracketed: bool) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if bracketed && c == ']' {
                break;
            }
            self.pos += 1;
        }
        self.chars[start..self.pos]
            .iter()
            .collect::<String>()
            .trim()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let name = TypeName::parse("System.Int32").unwrap();
        assert_eq!(name.namespace, "System");
        assert_eq!(name.nested, vec!["Int32".to_string()]);
        assert!(name.assembly.is_none());
        assert_eq!(name.to_string(), "System.Int32");
    }

    #[test]
    fn test_parse_global_namespace() {
        let name = TypeName::parse("Program").unwrap();
        assert_eq!(name.namespace, "");
        assert_eq!(name.definition_name(), "Program");
    }

    #[test]
    fn test_parse_assembly_qualified() {
        let text = "System.String, mscorlib, Version=4.0.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089";
        let name = TypeName::parse(text).unwrap();
        assert_eq!(name.full_name(), "System.String");
        assert_eq!(
            name.assembly.as_deref(),
            Some("mscorlib, Version=4.0.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089")
        );
        assert_eq!(name.to_string(), text);
    }

    #[test]
    fn test_parse_nested() {
        let name = TypeName::parse("App.Model.Order+Line+Detail, App").unwrap();
        assert_eq!(name.namespace, "App.Model");
        assert_eq!(name.nested, vec!["Order", "Line", "Detail"]);
        assert_eq!(name.definition_name(), "App.Model.Order+Line+Detail");
    }

    #[test]
    fn test_parse_generic_qualified_args() {
        let text = "System.Collections.Generic.KeyValuePair`2[[System.String, mscorlib],[System.Int32[], mscorlib]], mscorlib";
        let name = TypeName::parse(text).unwrap();
        assert_eq!(name.generic_args.len(), 2);
        assert_eq!(name.generic_args[1].array_ranks, vec![1]);
        assert_eq!(name.generic_args[1].assembly.as_deref(), Some("mscorlib"));
        assert_eq!(name.to_string(), text);
    }

    #[test]
    fn test_parse_generic_bare_args() {
        let name = TypeName::parse("System.Nullable`1[System.Int32]").unwrap();
        assert_eq!(name.generic_args.len(), 1);
        assert!(name.generic_args[0].assembly.is_none());
        assert_eq!(name.to_string(), "System.Nullable`1[System.Int32]");
    }

    #[test]
    fn test_parse_generic_args_with_spaces() {
        let name =
            TypeName::parse("System.Collections.Generic.Dictionary`2[ [System.String, mscorlib] , [System.Int32, mscorlib] ]")
                .unwrap();
        assert_eq!(name.generic_args.len(), 2);
        assert_eq!(name.generic_args[1].full_name(), "System.Int32");
    }

    #[test]
    fn test_parse_array_ranks() {
        let name = TypeName::parse("System.Byte[][,][,,]").unwrap();
        assert_eq!(name.array_ranks, vec![1, 2, 3]);
        assert_eq!(name.full_name(), "System.Byte[][,][,,]");
    }

    #[test]
    fn test_parse_generic_array() {
        let name = TypeName::parse("System.Collections.Generic.List`1[[System.Byte, mscorlib]][]").unwrap();
        assert_eq!(name.generic_args.len(), 1);
        assert_eq!(name.array_ranks, vec![1]);
    }

    #[test]
    fn test_escapes_roundtrip() {
        let name = TypeName::parse(r"Odd.Name\+With\,Specials, Lib").unwrap();
        assert_eq!(name.nested, vec!["Name+With,Specials"]);
        assert_eq!(name.to_string(), r"Odd.Name\+With\,Specials, Lib");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for text in [
            "",
            "   ",
            "System.",
            "System.Int32*",
            "System.Int32&",
            "System.Int32[*]",
            "System.Byte[][*]",
            "List`1[[System.Int32, mscorlib]",
            "System.Int32[",
            "System.Int32, ",
            "System.Int32]",
            r"Trailing\",
            "Outer+",
        ] {
            assert!(TypeName::parse(text).is_err(), "accepted '{}'", text);
        }
    }

    #[test]
    fn test_map_assemblies_recurses() {
        let mut name = TypeName::parse(
            "System.Collections.Generic.List`1[[System.Int32, OldLib]], OldLib",
        )
        .unwrap();
        name.map_assemblies(&mut |assembly| (assembly == "OldLib").then(|| "NewLib".to_string()));
        assert_eq!(
            name.to_string(),
            "System.Collections.Generic.List`1[[System.Int32, NewLib]], NewLib"
        );
    }
}
