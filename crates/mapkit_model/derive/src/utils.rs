use proc_macro2::{TokenStream, TokenTree};
use quote::ToTokens;
use syn::{Ident, LitStr};

// -----------------------------------------------------------------------------
// Type scanning

/// Returns `true` if any of `idents` appears in `tokens`, at any depth.
pub(crate) fn mentions(tokens: &impl ToTokens, idents: &[&Ident]) -> bool {
    fn scan(stream: TokenStream, idents: &[&Ident]) -> bool {
        stream.into_iter().any(|tree| match tree {
            TokenTree::Ident(ident) => idents.iter().any(|i| **i == ident),
            TokenTree::Group(group) => scan(group.stream(), idents),
            _ => false,
        })
    }
    scan(tokens.to_token_stream(), idents)
}

// -----------------------------------------------------------------------------
// RenameRule

/// Case conversion of variant names.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RenameRule {
    Lower,
    Upper,
    Snake,
    ScreamingSnake,
    Camel,
}

impl RenameRule {
    pub fn from_lit(lit: &LitStr) -> syn::Result<Self> {
        match lit.value().as_str() {
            "lowercase" => Ok(Self::Lower),
            "UPPERCASE" => Ok(Self::Upper),
            "snake_case" => Ok(Self::Snake),
            "SCREAMING_SNAKE_CASE" => Ok(Self::ScreamingSnake),
            "camelCase" => Ok(Self::Camel),
            _ => Err(syn::Error::new(
                lit.span(),
                "expected `lowercase`, `UPPERCASE`, `snake_case`, `SCREAMING_SNAKE_CASE` or `camelCase`",
            )),
        }
    }

    /// Apply the rule to a `PascalCase` variant name.
    pub fn apply(self, name: &str) -> String {
        match self {
            Self::Lower => name.to_lowercase(),
            Self::Upper => name.to_uppercase(),
            Self::Snake => snake_case(name),
            Self::ScreamingSnake => snake_case(name).to_uppercase(),
            Self::Camel => {
                let mut chars = name.chars();
                match chars.next() {
                    Some(first) => first.to_lowercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        }
    }
}

fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.char_indices() {
        if c.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use quote::format_ident;
    use syn::parse_quote;

    use super::{RenameRule, mentions};

    #[test]
    fn rename_rules() {
        assert_eq!(RenameRule::Lower.apply("HttpError"), "httperror");
        assert_eq!(RenameRule::Upper.apply("HttpError"), "HTTPERROR");
        assert_eq!(RenameRule::Snake.apply("HttpError"), "http_error");
        assert_eq!(RenameRule::ScreamingSnake.apply("HttpError"), "HTTP_ERROR");
        assert_eq!(RenameRule::Camel.apply("HttpError"), "httpError");
    }

    #[test]
    fn scan_nested_types() {
        let t = format_ident!("T");
        let ty: syn::Type = parse_quote!(Vec<Option<T>>);
        assert!(mentions(&ty, &[&t]));

        let ty: syn::Type = parse_quote!(Vec<Tree>);
        assert!(!mentions(&ty, &[&t]));
    }
}
