use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{parse_macro_input, Ident, ItemFn, Token};

/// Marks a function as a stand-in for a helper routine that a probed library
/// may call back into.
///
/// This attribute macro:
/// 1. Renames `fn foo` to `fn blastramp_stand_in_foo`
/// 2. Makes it `extern "C"`
/// 3. Registers a `StandIn` entry named `foo` pointing at `blastramp_stand_in_foo`
///
/// # Example
///
/// ```ignore
/// #[stand_in]
/// pub fn lsame(ca: *const libc::c_char, cb: *const libc::c_char) -> i64 {
///     // implementation
/// }
/// ```
///
/// Expands to:
///
/// ```ignore
/// pub extern "C" fn blastramp_stand_in_lsame(ca: *const libc::c_char, cb: *const libc::c_char) -> i64 {
///     // implementation
/// }
///
/// #[linkme::distributed_slice(crate::symbols::STAND_INS)]
/// static _STAND_IN_LSAME: crate::symbols::StandIn = crate::symbols::StandIn {
///     name: "lsame",
///     addr: crate::symbols::FnPtr(blastramp_stand_in_lsame as *const ()),
/// };
/// ```
#[proc_macro_attribute]
pub fn stand_in(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);

    let vis = &input.vis;
    let sig = &input.sig;
    let block = &input.block;
    let attrs = &input.attrs;

    let original_name = &sig.ident;
    let stand_in_name = format_ident!("blastramp_stand_in_{}", original_name);
    let symbol_name = original_name.to_string();
    let static_name = format_ident!("_STAND_IN_{}", symbol_name.to_uppercase());

    let inputs = &sig.inputs;
    let output = &sig.output;

    let expanded = quote! {
        #(#attrs)*
        #vis extern "C" fn #stand_in_name(#inputs) #output #block

        #[linkme::distributed_slice(crate::symbols::STAND_INS)]
        static #static_name: crate::symbols::StandIn = crate::symbols::StandIn {
            name: #symbol_name,
            addr: crate::symbols::FnPtr(#stand_in_name as *const ()),
        };
    };

    TokenStream::from(expanded)
}

/// Declares the forwarding slots for a list of exported routine names.
///
/// For every `name` this emits two unmangled statics, `name_addr` (LP64
/// binding) and `name64__addr` (ILP64 binding), so trampoline stubs can
/// reference them by symbol. It also emits `EXPORTED_FUNCS`, the slot pairs
/// in declaration order.
///
/// ```ignore
/// forwarding_table! { isamax, dpotrf }
/// ```
#[proc_macro]
pub fn forwarding_table(input: TokenStream) -> TokenStream {
    let names = match Punctuated::<Ident, Token![,]>::parse_terminated.parse(input) {
        Ok(names) => names,
        Err(err) => return err.to_compile_error().into(),
    };

    let mut slots = Vec::new();
    let mut entries = Vec::new();
    for name in &names {
        let base = name.to_string();
        let lp64 = format_ident!("{}_addr", base);
        let ilp64 = format_ident!("{}64__addr", base);

        slots.push(quote! {
            #[unsafe(no_mangle)]
            #[allow(non_upper_case_globals)]
            pub static #lp64: crate::forward::ForwardingSlot = crate::forward::ForwardingSlot::new();

            #[unsafe(no_mangle)]
            #[allow(non_upper_case_globals)]
            pub static #ilp64: crate::forward::ForwardingSlot = crate::forward::ForwardingSlot::new();
        });
        entries.push(quote! {
            crate::forward::ExportedFunc::new(#base, &#lp64, &#ilp64)
        });
    }

    let expanded = quote! {
        #(#slots)*

        /// Every exported routine with its LP64 and ILP64 slots, in catalog order.
        pub static EXPORTED_FUNCS: &[crate::forward::ExportedFunc] = &[
            #(#entries),*
        ];
    };

    TokenStream::from(expanded)
}
