use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::spanned::Spanned;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, LitInt, LitStr};

/// Type-level `#[csv(...)]` options
#[derive(Default)]
struct TypeOptions {
    policy: Option<(&'static str, Span)>,
}

/// Field-level `#[csv(...)]` options
#[derive(Default)]
struct FieldOptions {
    ignore: bool,
    order: Option<u32>,
    column_name: Option<LitStr>,
    mask: Option<LitStr>,
    parent: bool,
}

impl FieldOptions {
    fn has_column_options(&self) -> bool {
        self.ignore || self.order.is_some() || self.column_name.is_some() || self.mask.is_some()
    }
}

fn csv_attrs(attrs: &[Attribute]) -> impl Iterator<Item = &Attribute> {
    attrs.iter().filter(|attr| attr.path().is_ident("csv"))
}

fn parse_type_options(attrs: &[Attribute]) -> syn::Result<TypeOptions> {
    let mut options = TypeOptions::default();
    for attr in csv_attrs(attrs) {
        attr.parse_nested_meta(|meta| {
            let policy = if meta.path.is_ident("include_parent") {
                "IncludeParent"
            } else if meta.path.is_ident("include_ancestors") {
                "IncludeAncestors"
            } else {
                return Err(meta.error(
                    "unsupported type attribute, expected `include_parent` or `include_ancestors`",
                ));
            };
            if options.policy.is_some() {
                return Err(
                    meta.error("`include_parent` and `include_ancestors` are mutually exclusive")
                );
            }
            options.policy = Some((policy, meta.path.span()));
            Ok(())
        })?;
    }
    Ok(options)
}

fn parse_field_options(attrs: &[Attribute]) -> syn::Result<FieldOptions> {
    let mut options = FieldOptions::default();
    for attr in csv_attrs(attrs) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("ignore") {
                options.ignore = true;
            } else if meta.path.is_ident("parent") {
                options.parent = true;
            } else if meta.path.is_ident("order") {
                let lit: LitInt = meta.value()?.parse()?;
                options.order = Some(lit.base10_parse::<u32>()?);
            } else if meta.path.is_ident("column_name") {
                options.column_name = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("mask") {
                options.mask = Some(meta.value()?.parse()?);
            } else {
                return Err(meta.error(
                    "unsupported field attribute, expected one of `ignore`, `order`, `column_name`, `mask`, `parent`",
                ));
            }
            Ok(())
        })?;
    }
    Ok(options)
}

fn expand_csv_record(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let name_str = name.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "CsvRecord can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "CsvRecord can only be derived for structs",
            ))
        }
    };

    let type_options = parse_type_options(&input.attrs)?;
    let policy = syn::Ident::new(
        type_options.policy.map_or("OwnFields", |(p, _)| p),
        type_options.policy.map_or_else(Span::call_site, |(_, s)| s),
    );

    let mut field_calls = Vec::new();
    let mut parent_call = None;
    for field in fields {
        // Named fields always carry an ident
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let options = parse_field_options(&field.attrs)?;

        if options.parent {
            if options.has_column_options() {
                return Err(syn::Error::new_spanned(
                    ident,
                    "a `parent` field cannot carry `ignore`, `order`, `column_name` or `mask`",
                ));
            }
            if parent_call.is_some() {
                return Err(syn::Error::new_spanned(
                    ident,
                    "only one field can be marked as `parent`",
                ));
            }
            parent_call = Some(quote! {
                .parent(|record: &Self| &record.#ident)
            });
            continue;
        }

        let field_name = ident.to_string();
        let order = options.order.map(|o| quote!(.order(#o)));
        let column_name = options.column_name.map(|c| quote!(.display_name(#c)));
        let mask = options.mask.map(|m| quote!(.mask(#m)));
        let meta = quote!(::annotated_csv::FieldMeta::new() #order #column_name #mask);

        // Ignored fields are never written, so their type need not implement `ToCell`
        field_calls.push(if options.ignore {
            quote! {
                .try_field(#field_name, #meta.ignored(), |_: &Self| {
                    ::core::result::Result::Ok(::core::option::Option::None)
                })
            }
        } else {
            quote! {
                .field(#field_name, #meta, |record: &Self| &record.#ident)
            }
        });
    }

    Ok(quote! {
        impl #impl_generics ::annotated_csv::CsvRecord for #name #ty_generics #where_clause {
            fn schema() -> ::annotated_csv::TypeSchema<Self> {
                ::annotated_csv::TypeSchema::builder(#name_str)
                    .policy(::annotated_csv::InheritancePolicy::#policy)
                    #(#field_calls)*
                    #parent_call
                    .build()
            }
        }
    })
}

/// Derives `annotated_csv::CsvRecord` from `#[csv(...)]` attributes
///
/// See the `annotated_csv` crate for the supported attributes.
#[proc_macro_derive(CsvRecord, attributes(csv))]
pub fn derive_csv_record(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    expand_csv_record(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
