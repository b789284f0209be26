//! Procedural macros for the Cinema backend
//!
//! This crate provides macros to reduce boilerplate in the Cinema backend:
//!
//! - `delete_result!` - Generate GraphQL deletion-outcome types

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Ident, Token, parse::Parse, parse::ParseStream};

/// Generate a GraphQL deletion-outcome type.
///
/// A deletion never fails for a missing record; the outcome reports how many
/// documents were removed instead.
///
/// # Usage
///
/// ```ignore
/// delete_result!(DeleteMovieResult);
///
/// // With the entity name used in the generated docs
/// delete_result!(DeleteDirectorResult, Director);
/// ```
///
/// # Generated Code
///
/// For `delete_result!(DeleteMovieResult, Movie)`:
///
/// ```ignore
/// /// Outcome of deleting a Movie by id
/// #[derive(Debug, Clone, PartialEq, Eq, async_graphql::SimpleObject)]
/// pub struct DeleteMovieResult {
///     pub acknowledged: bool,
///     pub deleted_count: i32,
///     pub id: async_graphql::ID,
/// }
///
/// impl DeleteMovieResult {
///     pub fn from_rows_affected(id: impl Into<async_graphql::ID>, rows_affected: u64) -> Self { .. }
///     pub fn is_noop(&self) -> bool { self.deleted_count == 0 }
/// }
/// ```
#[proc_macro]
pub fn delete_result(input: TokenStream) -> TokenStream {
    let parsed = parse_macro_input!(input as DeleteResultInput);

    let struct_name = &parsed.name;
    let doc = match parsed.entity {
        Some(entity) => format!("Outcome of deleting a {} by id", entity),
        None => "Outcome of a delete-by-id mutation".to_string(),
    };

    let output = quote! {
        #[doc = #doc]
        #[derive(Debug, Clone, PartialEq, Eq, async_graphql::SimpleObject)]
        pub struct #struct_name {
            /// Whether the store accepted the delete request
            pub acknowledged: bool,
            /// Number of documents removed (0 or 1)
            pub deleted_count: i32,
            /// The id that was requested for deletion
            pub id: async_graphql::ID,
        }

        impl #struct_name {
            pub fn from_rows_affected(id: impl Into<async_graphql::ID>, rows_affected: u64) -> Self {
                Self {
                    acknowledged: true,
                    deleted_count: i32::try_from(rows_affected).unwrap_or(i32::MAX),
                    id: id.into(),
                }
            }

            /// True when nothing matched the requested id
            pub fn is_noop(&self) -> bool {
                self.deleted_count == 0
            }
        }
    };
    output.into()
}

/// Input for delete_result! macro
struct DeleteResultInput {
    name: Ident,
    entity: Option<Ident>,
}

impl Parse for DeleteResultInput {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let name: Ident = input.parse()?;

        let entity = if input.peek(Token![,]) {
            input.parse::<Token![,]>()?;
            Some(input.parse::<Ident>()?)
        } else {
            None
        };

        Ok(DeleteResultInput { name, entity })
    }
}
