use proc_macro2::{Span, TokenStream};
use quote::quote;
use std::collections::HashSet;
use syn::{
    Ident, ImplItem, ImplItemFn, ItemImpl, Member, Path, Token,
    parse::{Parse, ParseStream},
    parse_quote,
};

pub(crate) struct DecoratorArgs {
    field: Member,
    krate: Path,
}

impl Parse for DecoratorArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let field = if input.is_empty() || input.peek(Token![crate]) {
            Member::Named(Ident::new("inner", Span::call_site()))
        } else {
            input.parse()?
        };
        let mut krate: Path = parse_quote!(::brook_core);

        if input.peek(Token![,]) {
            input.parse::<Token![,]>()?;
        }

        while !input.is_empty() {
            if !input.peek(Token![crate]) {
                return Err(input.error("unknown attribute, expected `crate = path`"));
            }
            input.parse::<Token![crate]>()?;
            input.parse::<Token![=]>()?;
            krate = input.parse()?;

            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(DecoratorArgs { field, krate })
    }
}

pub(crate) fn expand(args: DecoratorArgs, mut input: ItemImpl) -> syn::Result<TokenStream> {
    let trait_path = match &input.trait_ {
        Some((None, path, _)) => path.clone(),
        _ => {
            return Err(syn::Error::new_spanned(
                &input.self_ty,
                "`#[decorator]` must be placed on an `impl Stream for T` block",
            ));
        }
    };

    let defined: HashSet<String> = input
        .items
        .iter()
        .filter_map(|item| match item {
            ImplItem::Fn(method) => Some(method.sig.ident.to_string()),
            _ => None,
        })
        .collect();

    for method in forwarding_methods(&trait_path, &args.field, &args.krate) {
        if !defined.contains(&method.sig.ident.to_string()) {
            input.items.push(ImplItem::Fn(method));
        }
    }

    Ok(quote! { #input })
}

fn forwarding_methods(stream: &Path, field: &Member, krate: &Path) -> Vec<ImplItemFn> {
    vec![
        parse_quote! {
            fn read(&mut self, length: usize) -> #krate::StreamResult<::std::vec::Vec<u8>> {
                #stream::read(&mut self.#field, length)
            }
        },
        parse_quote! {
            fn write(&mut self, data: &[u8]) -> #krate::StreamResult<usize> {
                #stream::write(&mut self.#field, data)
            }
        },
        parse_quote! {
            fn seek(&mut self, position: ::std::io::SeekFrom) -> #krate::StreamResult<()> {
                #stream::seek(&mut self.#field, position)
            }
        },
        parse_quote! {
            fn tell(&mut self) -> #krate::StreamResult<u64> {
                #stream::tell(&mut self.#field)
            }
        },
        parse_quote! {
            fn eof(&mut self) -> #krate::StreamResult<bool> {
                #stream::eof(&mut self.#field)
            }
        },
        parse_quote! {
            fn size(&self) -> #krate::StreamResult<::core::option::Option<u64>> {
                #stream::size(&self.#field)
            }
        },
        parse_quote! {
            fn is_readable(&self) -> #krate::StreamResult<bool> {
                #stream::is_readable(&self.#field)
            }
        },
        parse_quote! {
            fn is_writable(&self) -> #krate::StreamResult<bool> {
                #stream::is_writable(&self.#field)
            }
        },
        parse_quote! {
            fn is_seekable(&self) -> #krate::StreamResult<bool> {
                #stream::is_seekable(&self.#field)
            }
        },
        parse_quote! {
            fn metadata(&self) -> #krate::StreamResult<#krate::Metadata> {
                #stream::metadata(&self.#field)
            }
        },
        parse_quote! {
            fn close(&mut self) -> #krate::StreamResult<()> {
                #stream::close(&mut self.#field)
            }
        },
        parse_quote! {
            fn detach(&mut self) -> #krate::StreamResult<::core::option::Option<#krate::BoxResource>> {
                #stream::detach(&mut self.#field)
            }
        },
    ]
}
