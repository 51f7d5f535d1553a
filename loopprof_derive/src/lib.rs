use inflector::Inflector;
use proc_macro::TokenStream;
use quote::quote;
use syn::*;

/// Implements `Display` for a field-less enum by printing the lowercase
/// variant name, or the string given in `#[style("...")]`.
#[proc_macro_derive(LowerDisplay, attributes(style))]
pub fn display_lowercase(input: TokenStream) -> TokenStream {
	let input = parse_macro_input!(input as DeriveInput);

	let name = input.ident;
	let Data::Enum(DataEnum { variants, .. }) = input.data else {
		return Error::new(name.span(), "LowerDisplay is only defined for enums")
			.to_compile_error()
			.into();
	};

	let cases = variants.into_iter().map(|v| {
		let variant_name = &v.ident;
		let variant_str = variant_name.to_string().to_lowercase();
		for attr in &v.attrs {
			if attr.path().is_ident("style") {
				return match attr.parse_args::<LitStr>() {
					Ok(lit_str) => {
						let val = lit_str.value();
						quote! {
							#name::#variant_name => write!(f, "{}", #val)
						}
					}
					Err(_) => Error::new_spanned(attr, "Expected a string literal")
						.to_compile_error(),
				};
			}
		}
		quote! {
			#name::#variant_name => write!(f, "{}", #variant_str)
		}
	});

	let expanded = quote! {
		impl std::fmt::Display for #name {
			fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
				match self {
					#( #cases, )*
				}
			}
		}
	};

	TokenStream::from(expanded)
}

/// Gives a pass its stable identity: the kebab-case type name with a
/// trailing `Pass` or `Legacy` removed, so `InsertTimerPass` and
/// `InsertTimerLegacy` both answer to `insert-timer`.
#[proc_macro_derive(PassName)]
pub fn pass_name_derive(input: TokenStream) -> TokenStream {
	let input = parse_macro_input!(input as DeriveInput);

	let name = input.ident;
	let (impl_generics, ty_generics, where_clause) =
		input.generics.split_for_impl();
	let type_name = name.to_string();
	let stem = type_name
		.strip_suffix("Pass")
		.or_else(|| type_name.strip_suffix("Legacy"))
		.unwrap_or(&type_name);
	let pass_name = stem.to_kebab_case();

	let expanded = quote! {
		impl #impl_generics PassName for #name #ty_generics #where_clause {
			const NAME: &'static str = #pass_name;
		}
	};

	TokenStream::from(expanded)
}
