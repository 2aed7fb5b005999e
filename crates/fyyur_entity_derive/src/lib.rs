//! `#[record_entity]` adds the bookkeeping columns shared by every Fyyur table
//! (`id`, `created_at`, `updated_at`) to a sea-orm `Model` and wires the DAO
//! helper traits for the generated `ActiveModel`.
//!
//! Must be placed above `#[sea_orm::model]` so the injected fields are seen by
//! the sea-orm derive.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    Field, Fields, ItemStruct, LitStr, Path, meta::ParseNestedMeta, parse_macro_input, parse_quote,
};

struct RecordOptions {
    traits: Path,
}

impl Default for RecordOptions {
    fn default() -> Self {
        Self {
            traits: parse_quote!(crate::db::dao::base_traits),
        }
    }
}

impl RecordOptions {
    fn parse(&mut self, meta: ParseNestedMeta) -> syn::Result<()> {
        if meta.path.is_ident("traits") {
            let value: LitStr = meta.value()?.parse()?;
            self.traits = value.parse()?;
            return Ok(());
        }
        Err(meta.error("unsupported record_entity option, expected `traits = \"path\"`"))
    }
}

#[proc_macro_attribute]
pub fn record_entity(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut options = RecordOptions::default();
    let parser = syn::meta::parser(|meta| options.parse(meta));
    parse_macro_input!(attr with parser);

    let input = parse_macro_input!(item as ItemStruct);
    match expand(options, input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(options: RecordOptions, mut input: ItemStruct) -> syn::Result<TokenStream2> {
    let Fields::Named(named) = &mut input.fields else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "record_entity only supports structs with named fields",
        ));
    };

    let declared: Vec<String> = named
        .named
        .iter()
        .filter_map(|field| field.ident.as_ref().map(ToString::to_string))
        .collect();

    let mut fields: Vec<Field> = bookkeeping_fields()
        .into_iter()
        .filter(|(name, _)| !declared.iter().any(|existing| existing == name))
        .map(|(_, field)| field)
        .collect();
    fields.extend(named.named.iter().cloned());
    named.named = fields.into_iter().collect();

    let traits = options.traits;
    Ok(quote! {
        #input

        impl #traits::RecordActiveModel for ActiveModel {
            fn stamp_new(
                &mut self,
                id: uuid::Uuid,
                now: sea_orm::entity::prelude::DateTimeWithTimeZone,
            ) {
                self.id = sea_orm::ActiveValue::Set(id);
                self.created_at = sea_orm::ActiveValue::Set(now);
                self.updated_at = sea_orm::ActiveValue::Set(now);
            }

            fn touch(&mut self, now: sea_orm::entity::prelude::DateTimeWithTimeZone) {
                self.updated_at = sea_orm::ActiveValue::Set(now);
            }
        }

        impl #traits::RecordColumns for Entity {
            fn created_at_column() -> Column {
                Column::CreatedAt
            }
        }
    })
}

fn bookkeeping_fields() -> [(&'static str, Field); 3] {
    [
        (
            "id",
            parse_quote! {
                #[sea_orm(primary_key, auto_increment = false)]
                pub id: uuid::Uuid
            },
        ),
        (
            "created_at",
            parse_quote! {
                #[sea_orm(default_expr = "Expr::current_timestamp()")]
                pub created_at: sea_orm::entity::prelude::DateTimeWithTimeZone
            },
        ),
        (
            "updated_at",
            parse_quote! {
                #[sea_orm(default_expr = "Expr::current_timestamp()")]
                pub updated_at: sea_orm::entity::prelude::DateTimeWithTimeZone
            },
        ),
    ]
}
