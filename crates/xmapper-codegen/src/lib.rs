// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

extern crate proc_macro;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{
    parse_macro_input, Data, DeriveInput, Fields, FnArg, GenericArgument, Ident, ItemTrait, Pat,
    PathArguments, ReturnType, Token, TraitItem, TraitItemFn, Type,
};

/// Suffix of the generated implementation type. Must match
/// `xmapper::IMPLEMENTATION_SUFFIX`.
const IMPLEMENTATION_SUFFIX: &str = "Impl";

/// `#[derive(Mappable)]`: type descriptor, shape registration and value
/// conversions for a bean (named-field struct) or an enumeration
/// (fieldless enum).
///
/// The canonical name of the type is `module_path!()::Ident`.
///
/// Example:
/// ```ignore
/// use xmapper::Mappable;
///
/// #[derive(Mappable)]
/// pub struct PersonIn {
///     pub name: String,
///     pub age: u32,
///     pub role: Role,
/// }
///
/// #[derive(Mappable)]
/// pub enum Role { Admin, User }
/// ```
#[proc_macro_derive(Mappable)]
pub fn derive_mappable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_mappable(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// `#[mapper]`: turns a trait into a mapping contract and generates its
/// implementation, `<Trait>Impl`.
///
/// Every method takes `&self` and exactly one source value, and returns
/// `Result<Target, E>` where `E: From<MapError>`.
///
/// Options: `ignore_missing_properties` (or `ignore_missing_properties =
/// true`) leaves unmatched target properties and enum constants at their
/// default instead of rejecting the contract.
///
/// Example:
/// ```ignore
/// #[xmapper::mapper(ignore_missing_properties = true)]
/// pub trait BeanMapper {
///     fn convert_from(&self, source: PersonIn) -> Result<PersonOut, MapError>;
/// }
/// ```
#[proc_macro_attribute]
pub fn mapper(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut options = MapperOptions::default();
    let parser = syn::meta::parser(|meta| options.parse(meta));
    parse_macro_input!(attr with parser);

    let item = parse_macro_input!(item as ItemTrait);
    expand_mapper(&options, item)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

#[derive(Debug, Default)]
struct MapperOptions {
    ignore_missing_properties: bool,
}

impl MapperOptions {
    fn parse(&mut self, meta: syn::meta::ParseNestedMeta<'_>) -> syn::Result<()> {
        if meta.path.is_ident("ignore_missing_properties") {
            self.ignore_missing_properties = if meta.input.peek(Token![=]) {
                meta.value()?.parse::<syn::LitBool>()?.value
            } else {
                true
            };
            Ok(())
        } else {
            Err(meta.error("unsupported mapper option, expected `ignore_missing_properties`"))
        }
    }
}

fn expand_mappable(input: &DeriveInput) -> syn::Result<TokenStream2> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Mappable cannot be derived for generic types",
        ));
    }

    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => {
                let fields = fields
                    .named
                    .iter()
                    .map(|field| {
                        let ident = field.ident.clone().ok_or_else(|| {
                            syn::Error::new_spanned(field, "field must have a name")
                        })?;
                        Ok((ident, field.ty.clone()))
                    })
                    .collect::<syn::Result<Vec<_>>>()?;
                Ok(expand_bean(&input.ident, &fields))
            }
            _ => Err(syn::Error::new_spanned(
                input,
                "Mappable beans must have named fields",
            )),
        },
        Data::Enum(data) => {
            if data.variants.is_empty() {
                return Err(syn::Error::new_spanned(
                    input,
                    "Mappable enumerations need at least one constant",
                ));
            }
            let constants = data
                .variants
                .iter()
                .map(|variant| match variant.fields {
                    Fields::Unit => Ok(variant.ident.clone()),
                    _ => Err(syn::Error::new_spanned(
                        variant,
                        "Mappable enumerations cannot carry data",
                    )),
                })
                .collect::<syn::Result<Vec<_>>>()?;
            Ok(expand_enum(&input.ident, &constants))
        }
        Data::Union(_) => Err(syn::Error::new_spanned(
            input,
            "Mappable cannot be derived for unions",
        )),
    }
}

fn canonical_name(ident: &Ident) -> TokenStream2 {
    let name = ident.unraw().to_string();
    quote! { concat!(module_path!(), "::", #name) }
}

fn expand_bean(ident: &Ident, fields: &[(Ident, Type)]) -> TokenStream2 {
    let name = canonical_name(ident);
    let names: Vec<String> = fields.iter().map(|(f, _)| f.unraw().to_string()).collect();
    let idents: Vec<&Ident> = fields.iter().map(|(f, _)| f).collect();
    let types: Vec<&Type> = fields.iter().map(|(_, ty)| ty).collect();

    quote! {
        impl ::xmapper::Mappable for #ident {
            fn type_descriptor() -> ::xmapper::TypeDescriptor {
                ::xmapper::TypeDescriptor::declared(#name)
            }

            fn describe(catalog: &mut ::xmapper::TypeCatalog) {
                // Registered before recursing so cycles terminate.
                let inserted = catalog.insert_bean(
                    <Self as ::xmapper::Mappable>::type_descriptor(),
                    vec![
                        #(::xmapper::Property::new(
                            #names,
                            <#types as ::xmapper::Mappable>::type_descriptor(),
                        )),*
                    ],
                    Some(<Self as ::xmapper::Mappable>::default_value()),
                );
                if inserted {
                    #(<#types as ::xmapper::Mappable>::describe(catalog);)*
                }
            }

            fn into_value(self) -> ::xmapper::Value {
                ::xmapper::Value::Bean(
                    ::xmapper::BeanValue::new(#name)
                        #(.with(#names, ::xmapper::Mappable::into_value(self.#idents)))*
                )
            }

            #[allow(unused_mut, unused_variables)]
            fn from_value(value: ::xmapper::Value) -> ::core::result::Result<Self, ::xmapper::MapError> {
                let mut bean = value.into_bean()?;
                Ok(Self {
                    #(#idents: <#types as ::xmapper::Mappable>::from_value(bean.take(#names)?)?,)*
                })
            }

            fn default_value() -> ::xmapper::Value {
                ::xmapper::Value::Bean(
                    ::xmapper::BeanValue::new(#name)
                        #(.with(#names, <#types as ::xmapper::Mappable>::default_value()))*
                )
            }
        }
    }
}

fn expand_enum(ident: &Ident, constants: &[Ident]) -> TokenStream2 {
    let name = canonical_name(ident);
    let names: Vec<String> = constants.iter().map(|c| c.unraw().to_string()).collect();
    let first = &names[0];

    quote! {
        impl ::xmapper::Mappable for #ident {
            fn type_descriptor() -> ::xmapper::TypeDescriptor {
                ::xmapper::TypeDescriptor::enumeration(#name)
            }

            fn describe(catalog: &mut ::xmapper::TypeCatalog) {
                catalog.insert_enum(
                    <Self as ::xmapper::Mappable>::type_descriptor(),
                    vec![#(::std::string::String::from(#names)),*],
                );
            }

            fn into_value(self) -> ::xmapper::Value {
                let constant = match self {
                    #(Self::#constants => #names,)*
                };
                ::xmapper::Value::Enum(::xmapper::EnumValue::new(#name, constant))
            }

            fn from_value(value: ::xmapper::Value) -> ::core::result::Result<Self, ::xmapper::MapError> {
                let value = value.into_enum()?;
                match value.constant.as_str() {
                    #(#names => Ok(Self::#constants),)*
                    _ => Err(::xmapper::MapError::UnknownConstant {
                        enumeration: ::std::string::String::from(#name),
                        constant: value.constant,
                    }),
                }
            }

            fn default_value() -> ::xmapper::Value {
                ::xmapper::Value::Enum(::xmapper::EnumValue::new(#name, #first))
            }
        }
    }
}

/// One contract method, as parsed from the trait.
struct MethodSpec {
    ident: Ident,
    arg: Ident,
    source: Type,
    target: Type,
}

fn parse_method(method: &TraitItemFn) -> syn::Result<MethodSpec> {
    let sig = &method.sig;
    if method.default.is_some() {
        return Err(syn::Error::new_spanned(
            &method.default,
            "mapper methods are generated and cannot have a body",
        ));
    }
    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &sig.generics,
            "mapper methods cannot be generic",
        ));
    }

    let mut inputs = sig.inputs.iter();
    match inputs.next() {
        Some(FnArg::Receiver(receiver))
            if receiver.reference.is_some() && receiver.mutability.is_none() => {}
        _ => {
            return Err(syn::Error::new_spanned(
                sig,
                "mapper methods must take `&self`",
            ))
        }
    }

    let (arg, source) = match (inputs.next(), inputs.next()) {
        (Some(FnArg::Typed(typed)), None) => {
            let arg = match typed.pat.as_ref() {
                Pat::Ident(pat) => pat.ident.clone(),
                other => {
                    return Err(syn::Error::new_spanned(
                        other,
                        "the source parameter must be a plain identifier",
                    ))
                }
            };
            (arg, (*typed.ty).clone())
        }
        _ => {
            return Err(syn::Error::new_spanned(
                &sig.inputs,
                "mapper methods take exactly one source parameter",
            ))
        }
    };

    let target = result_ok_type(&sig.output).ok_or_else(|| {
        syn::Error::new_spanned(&sig.output, "mapper methods must return `Result<Target, E>`")
    })?;

    Ok(MethodSpec {
        ident: sig.ident.clone(),
        arg,
        source,
        target,
    })
}

/// `Target` out of `-> Result<Target, ..>` (any path ending in `Result`).
fn result_ok_type(output: &ReturnType) -> Option<Type> {
    let ReturnType::Type(_, ty) = output else {
        return None;
    };
    let Type::Path(path) = ty.as_ref() else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != "Result" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(ty) => Some(ty.clone()),
        _ => None,
    }
}

fn expand_mapper(options: &MapperOptions, mut item: ItemTrait) -> syn::Result<TokenStream2> {
    if !item.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &item.generics,
            "mapping contracts cannot be generic",
        ));
    }

    let mut methods = Vec::new();
    for trait_item in &item.items {
        match trait_item {
            TraitItem::Fn(method) => methods.push(parse_method(method)?),
            other => {
                return Err(syn::Error::new_spanned(
                    other,
                    "mapping contracts may only declare methods",
                ))
            }
        }
    }

    item.supertraits.push(syn::parse_quote!(::core::marker::Send));
    item.supertraits.push(syn::parse_quote!(::core::marker::Sync));

    let vis = &item.vis;
    let trait_ident = &item.ident;
    let impl_ident = format_ident!("{}{}", trait_ident, IMPLEMENTATION_SUFFIX);
    let contract_name = canonical_name(trait_ident);
    let ignore = options.ignore_missing_properties;

    let method_names: Vec<String> = methods.iter().map(|m| m.ident.unraw().to_string()).collect();
    let method_idents: Vec<&Ident> = methods.iter().map(|m| &m.ident).collect();
    let args: Vec<&Ident> = methods.iter().map(|m| &m.arg).collect();
    let sources: Vec<&Type> = methods.iter().map(|m| &m.source).collect();
    let targets: Vec<&Type> = methods.iter().map(|m| &m.target).collect();
    let outputs: Vec<&ReturnType> = item
        .items
        .iter()
        .filter_map(|i| match i {
            TraitItem::Fn(method) => Some(&method.sig.output),
            _ => None,
        })
        .collect();
    let indices = 0..methods.len();

    let doc = format!("Generated implementation of [`{}`].", trait_ident);

    Ok(quote! {
        #item

        #[doc = #doc]
        #[derive(Debug, Clone)]
        #vis struct #impl_ident {
            engine: ::xmapper::MappingEngine,
        }

        impl #impl_ident {
            /// Contract declaration for this mapper.
            pub fn contract() -> ::xmapper::MappingContract {
                ::xmapper::MappingContract::new(
                    #contract_name,
                    ::xmapper::MapperConfig {
                        ignore_missing_properties: #ignore,
                    },
                )
                #(.method(
                    #method_names,
                    <#sources as ::xmapper::Mappable>::type_descriptor(),
                    <#targets as ::xmapper::Mappable>::type_descriptor(),
                ))*
            }

            /// Shapes of every type the contract reaches.
            #[allow(unused_mut)]
            pub fn catalog() -> ::xmapper::TypeCatalog {
                let mut catalog = ::xmapper::TypeCatalog::new();
                #(
                    <#sources as ::xmapper::Mappable>::describe(&mut catalog);
                    <#targets as ::xmapper::Mappable>::describe(&mut catalog);
                )*
                catalog
            }

            /// Validate the contract and build its plan.
            pub fn plan() -> ::core::result::Result<::xmapper::MappingPlan, ::xmapper::Diagnostics> {
                let catalog = Self::catalog();
                ::xmapper::Planner::new(&catalog).plan(&Self::contract())
            }

            pub fn new() -> ::core::result::Result<Self, ::xmapper::Diagnostics> {
                Ok(Self {
                    engine: ::xmapper::MappingEngine::new(Self::plan()?),
                })
            }

            pub fn with_factory(
                factory: ::xmapper::FactoryHandle,
            ) -> ::core::result::Result<Self, ::xmapper::Diagnostics> {
                Ok(Self {
                    engine: ::xmapper::MappingEngine::with_factory(Self::plan()?, factory),
                })
            }

            pub fn engine(&self) -> &::xmapper::MappingEngine {
                &self.engine
            }
        }

        impl ::xmapper::MapperImplementation for #impl_ident {
            const CONTRACT_ID: &'static str = #contract_name;

            fn construct() -> ::core::result::Result<Self, ::xmapper::ConstructionError> {
                Self::new().map_err(::xmapper::ConstructionError::new)
            }

            fn construct_with_factory(
                factory: ::xmapper::FactoryHandle,
            ) -> ::core::result::Result<Self, ::xmapper::ConstructionError> {
                Self::with_factory(factory).map_err(::xmapper::ConstructionError::new)
            }
        }

        impl #trait_ident for #impl_ident {
            #(
                fn #method_idents(&self, #args: #sources) #outputs {
                    self.engine
                        .convert::<#sources, #targets>(#indices, #args)
                        .map_err(::core::convert::Into::into)
                }
            )*
        }

        impl ::xmapper::Contract for dyn #trait_ident {
            const CONTRACT_ID: &'static str = #contract_name;

            fn from_instance(
                instance: &::xmapper::MapperInstance,
            ) -> ::core::option::Option<::std::sync::Arc<Self>> {
                instance
                    .downcast::<#impl_ident>()
                    .map(|mapper| mapper as ::std::sync::Arc<dyn #trait_ident>)
            }
        }
    })
}
