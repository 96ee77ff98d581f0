use proc_macro::TokenStream;
use syn::{ItemImpl, parse_macro_input};

mod decorator;

/// Completes an `impl Stream for T` block with forwarding methods.
///
/// Every required `Stream` method the block does not define is generated to
/// forward to the named field. Provided methods (`rewind`, `contents`,
/// `try_to_bytes`, `to_bytes`, `metadata_value`) keep their trait defaults,
/// so they run through the decorator's own overrides: a decorator that
/// overrides `read` also changes what `contents` and `to_bytes` return.
///
/// # Arguments
///
/// - the field holding the inner stream: a name or a tuple index
///   (defaults to `inner`)
/// - `crate = path`: where `StreamResult` and friends live
///   (defaults to `::brook_core`)
///
/// # Example
///
/// ```rust,ignore
/// struct ReadOnly<S> {
///     inner: S,
/// }
///
/// #[brook::decorator(inner, crate = ::brook::brook_core)]
/// impl<S: Stream> Stream for ReadOnly<S> {
///     fn is_writable(&self) -> StreamResult<bool> {
///         Ok(false)
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn decorator(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as decorator::DecoratorArgs);
    let input = parse_macro_input!(item as ItemImpl);

    decorator::expand(args, input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
