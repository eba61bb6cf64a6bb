//! Entity definitions from annotated Rust source
//!
//! Every named struct becomes an entity definition and every enum an
//! enumeration descriptor. Recognized attributes:
//!
//! - structs: `#[table(name = "..")]` or `#[table_name = ".."]`, `#[extends(Parent)]`
//! - fields and accessor methods: `#[column(..)]`, `#[column_name = ".."]`,
//!   `#[collection_table(name = "..")]`, `#[enumerated]`, `#[lob]` and
//!   `#[composed(Name, ..)]` wrapping any of these
//! - enums: `#[dict]`; variants take their backing value from `#[value = ..]`,
//!   `#[value(decimal = "..")]` or the discriminant

use crate::definition::{
    AccessorDefinition, AccessorKind, DefinitionSet, EntityDefinition, FieldDefinition,
};
use crate::error::Result;
use entity_metadata::entity::{
    Annotation, CollectionTable, Column, Composed, DictValue, EnumConstant, EnumDescriptor,
    Enumerated, Lob,
};
use quote::ToTokens;
use std::fmt::Display;
use std::str::FromStr;
use syn::ext::IdentExt;
use syn::punctuated::Punctuated;
use syn::{
    Attribute, Expr, ExprLit, ExprUnary, Field, Fields, FnArg, ImplItem, Item, ItemEnum, ItemImpl,
    ItemStruct, Lit, LitBool, LitInt, LitStr, Meta, ReturnType, Signature, Token, Type, UnOp,
};

/// Parse a Rust source file into definitions
pub fn parse_source(content: &str) -> Result<DefinitionSet> {
    let file = syn::parse_file(content)?;
    let mut set = DefinitionSet::new();
    collect_items(&file.items, &mut set)?;
    Ok(set)
}

fn collect_items(items: &[Item], set: &mut DefinitionSet) -> Result<()> {
    for item in items {
        match item {
            Item::Struct(item) => {
                if let Some(entity) = parse_struct(item)? {
                    set.add_entity(entity);
                }
            }
            Item::Enum(item) => set.add_enum(parse_enum(item)?),
            Item::Impl(item) => parse_impl(item, set)?,
            Item::Mod(module) => {
                if let Some((_, items)) = &module.content {
                    collect_items(items, set)?;
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn parse_struct(item: &ItemStruct) -> Result<Option<EntityDefinition>> {
    let fields = match &item.fields {
        Fields::Named(named) => named
            .named
            .iter()
            .map(parse_field)
            .collect::<Result<Vec<_>>>()?,
        Fields::Unit => Vec::new(),
        Fields::Unnamed(_) => {
            log::debug!("Skipping tuple struct {}", item.ident);
            return Ok(None);
        }
    };

    Ok(Some(EntityDefinition {
        name: item.ident.unraw().to_string(),
        table_name: table_name(&item.attrs)?,
        extends: superclass(&item.attrs)?,
        fields,
    }))
}

fn parse_field(field: &Field) -> Result<FieldDefinition> {
    let name = field
        .ident
        .as_ref()
        .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;

    Ok(FieldDefinition {
        name: name.unraw().to_string(),
        ty: field.ty.clone(),
        annotations: annotations(&field.attrs)?,
    })
}

fn parse_enum(item: &ItemEnum) -> Result<EnumDescriptor> {
    let name = item.ident.unraw().to_string();

    if !has_attribute(&item.attrs, "dict") {
        let constants = item
            .variants
            .iter()
            .map(|variant| EnumConstant::new(variant.ident.unraw().to_string()))
            .collect();
        return Ok(EnumDescriptor {
            name,
            constants,
            dictionary: false,
        });
    }

    let mut constants = Vec::with_capacity(item.variants.len());
    for variant in &item.variants {
        let value = match variant.attrs.iter().find(|a| a.path().is_ident("value")) {
            Some(attr) => Some(attribute_value(&attr.meta)?),
            None => variant
                .discriminant
                .as_ref()
                .map(|(_, expr)| dict_value(expr))
                .transpose()?,
        };
        constants.push(EnumConstant {
            name: variant.ident.unraw().to_string(),
            value,
        });
    }
    Ok(EnumDescriptor::dictionary(name, constants))
}

/// Register annotated accessor methods of inherent impl blocks
fn parse_impl(item: &ItemImpl, set: &mut DefinitionSet) -> Result<()> {
    if item.trait_.is_some() {
        return Ok(());
    }
    let Type::Path(self_ty) = item.self_ty.as_ref() else {
        return Ok(());
    };
    let Some(entity) = self_ty.path.segments.last().map(|s| s.ident.unraw().to_string()) else {
        return Ok(());
    };

    for impl_item in &item.items {
        let ImplItem::Fn(method) = impl_item else {
            continue;
        };
        let annotations = annotations(&method.attrs)?;
        if annotations.is_empty() {
            continue;
        }
        match accessor(&method.sig) {
            Some((property, kind, ty)) => set.add_accessor(
                entity.as_str(),
                AccessorDefinition {
                    property,
                    kind,
                    ty,
                    annotations,
                },
            ),
            None => log::warn!(
                "{}::{} has persistence attributes but is not a getter or setter",
                entity,
                method.sig.ident
            ),
        }
    }
    Ok(())
}

/// `fn x(&self) -> T`, `fn get_x(&self) -> T` and `fn is_x(&self) -> T` are
/// getters; `fn set_x(&mut self, value: T)` is a setter.
fn accessor(sig: &Signature) -> Option<(String, AccessorKind, Type)> {
    let name = sig.ident.unraw().to_string();
    let mut inputs = sig.inputs.iter();
    let receiver = match inputs.next()? {
        FnArg::Receiver(receiver) => receiver,
        FnArg::Typed(_) => return None,
    };
    let args: Vec<_> = inputs
        .filter_map(|arg| match arg {
            FnArg::Typed(typed) => Some(typed),
            FnArg::Receiver(_) => None,
        })
        .collect();

    match (&sig.output, args.as_slice()) {
        (ReturnType::Type(_, ty), []) => {
            let property = name
                .strip_prefix("get_")
                .or_else(|| name.strip_prefix("is_"))
                .unwrap_or(name.as_str());
            if property.is_empty() {
                return None;
            }
            Some((property.to_string(), AccessorKind::Getter, (**ty).clone()))
        }
        (ReturnType::Default, [arg]) if receiver.mutability.is_some() => {
            let property = name.strip_prefix("set_").filter(|p| !p.is_empty())?;
            Some((property.to_string(), AccessorKind::Setter, (*arg.ty).clone()))
        }
        _ => None,
    }
}

fn table_name(attrs: &[Attribute]) -> Result<Option<String>> {
    for attr in attrs {
        let path = attr.path();
        if path.is_ident("table") {
            return Ok(Some(named(&attr.meta)?));
        }
        if path.is_ident("table_name") {
            return Ok(Some(lit_str(&attr.meta.require_name_value()?.value)?));
        }
    }
    Ok(None)
}

fn superclass(attrs: &[Attribute]) -> Result<Option<String>> {
    match attrs.iter().find(|a| a.path().is_ident("extends")) {
        Some(attr) => {
            let path: syn::Path = attr.parse_args()?;
            Ok(path.segments.last().map(|s| s.ident.unraw().to_string()))
        }
        None => Ok(None),
    }
}

fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}

fn annotations(attrs: &[Attribute]) -> Result<Vec<Annotation>> {
    let mut found = Vec::new();
    for attr in attrs {
        if let Some(annotation) = annotation(&attr.meta)? {
            found.push(annotation);
        }
    }
    Ok(found)
}

/// Persistence annotation for `meta`, `None` for unrelated attributes
fn annotation(meta: &Meta) -> syn::Result<Option<Annotation>> {
    let path = meta.path();
    let annotation = if path.is_ident("column") {
        column(meta)?.into()
    } else if path.is_ident("column_name") {
        Column::named(lit_str(&meta.require_name_value()?.value)?).into()
    } else if path.is_ident("collection_table") {
        CollectionTable::new(named(meta)?).into()
    } else if path.is_ident("enumerated") {
        meta.require_path_only()?;
        Enumerated.into()
    } else if path.is_ident("lob") {
        meta.require_path_only()?;
        Lob.into()
    } else if path.is_ident("composed") {
        composed(meta)?.into()
    } else {
        return Ok(None);
    };
    Ok(Some(annotation))
}

fn column(meta: &Meta) -> syn::Result<Column> {
    let mut column = Column::default();
    match meta {
        Meta::Path(_) => {}
        Meta::NameValue(name_value) => column.name = lit_str(&name_value.value)?,
        Meta::List(list) => list.parse_nested_meta(|nested| {
            if nested.path.is_ident("name") {
                column.name = nested.value()?.parse::<LitStr>()?.value();
            } else if nested.path.is_ident("length") {
                column.length = nested.value()?.parse::<LitInt>()?.base10_parse()?;
            } else if nested.path.is_ident("precision") {
                column.precision = nested.value()?.parse::<LitInt>()?.base10_parse()?;
            } else if nested.path.is_ident("nullable") {
                column.nullable = nested.value()?.parse::<LitBool>()?.value;
            } else if nested.path.is_ident("updatable") {
                column.updatable = nested.value()?.parse::<LitBool>()?.value;
            } else if nested.path.is_ident("column_definition") {
                column.column_definition = nested.value()?.parse::<LitStr>()?.value();
            } else {
                return Err(nested.error("unsupported column attribute"));
            }
            Ok(())
        })?,
    }
    Ok(column)
}

/// `#[composed(CreatedAt, column(name = "created_at"), ..)]`
fn composed(meta: &Meta) -> syn::Result<Composed> {
    let list = meta.require_list()?;
    let metas = list.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)?;
    let mut metas = metas.iter();

    let name = match metas.next() {
        Some(Meta::Path(path)) => path.to_token_stream().to_string().replace(' ', ""),
        _ => {
            return Err(syn::Error::new_spanned(
                list,
                "expected the composed annotation name first",
            ))
        }
    };

    let mut inner = Vec::new();
    for meta in metas {
        match annotation(meta)? {
            Some(annotation) => inner.push(annotation),
            None => return Err(syn::Error::new_spanned(meta, "unsupported meta-annotation")),
        }
    }
    Ok(Composed::new(name, inner))
}

/// Name of `#[x]`, `#[x = ".."]` or `#[x(name = "..")]`; empty when absent
fn named(meta: &Meta) -> syn::Result<String> {
    let mut name = String::new();
    match meta {
        Meta::Path(_) => {}
        Meta::NameValue(name_value) => name = lit_str(&name_value.value)?,
        Meta::List(list) => list.parse_nested_meta(|nested| {
            if nested.path.is_ident("name") {
                name = nested.value()?.parse::<LitStr>()?.value();
                Ok(())
            } else {
                Err(nested.error("expected `name`"))
            }
        })?,
    }
    Ok(name)
}

fn lit_str(expr: &Expr) -> syn::Result<String> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) => Ok(s.value()),
        other => Err(syn::Error::new_spanned(other, "expected a string literal")),
    }
}

fn attribute_value(meta: &Meta) -> syn::Result<DictValue> {
    match meta {
        Meta::NameValue(name_value) => dict_value(&name_value.value),
        Meta::List(list) => {
            let mut value = None;
            list.parse_nested_meta(|nested| {
                if nested.path.is_ident("decimal") {
                    let literal = nested.value()?.parse::<LitStr>()?;
                    value = Some(DictValue::Decimal(parse_number(&literal, &literal.value())?));
                    Ok(())
                } else {
                    Err(nested.error("expected `decimal`"))
                }
            })?;
            value.ok_or_else(|| syn::Error::new_spanned(list, "missing backing value"))
        }
        Meta::Path(path) => Err(syn::Error::new_spanned(path, "missing backing value")),
    }
}

fn dict_value(expr: &Expr) -> syn::Result<DictValue> {
    match expr {
        Expr::Lit(ExprLit { lit, .. }) => lit_value(lit, false),
        Expr::Unary(ExprUnary {
            op: UnOp::Neg(_),
            expr,
            ..
        }) => match expr.as_ref() {
            Expr::Lit(ExprLit { lit, .. }) => lit_value(lit, true),
            other => Err(syn::Error::new_spanned(other, "expected a literal backing value")),
        },
        Expr::Group(group) => dict_value(&group.expr),
        Expr::Paren(paren) => dict_value(&paren.expr),
        other => Err(syn::Error::new_spanned(other, "expected a literal backing value")),
    }
}

/// Unsuffixed integers are `i32` and unsuffixed floats `f64`, as in Rust
fn lit_value(lit: &Lit, negative: bool) -> syn::Result<DictValue> {
    let sign = if negative { "-" } else { "" };
    let value = match lit {
        Lit::Int(int) => {
            let digits = format!("{}{}", sign, int.base10_digits());
            match int.suffix() {
                "" | "i32" => DictValue::I32(parse_number(int, &digits)?),
                "i8" => DictValue::I8(parse_number(int, &digits)?),
                "i16" => DictValue::I16(parse_number(int, &digits)?),
                "i64" => DictValue::I64(parse_number(int, &digits)?),
                other => {
                    return Err(syn::Error::new_spanned(
                        int,
                        format!("unsupported integer suffix `{}`", other),
                    ))
                }
            }
        }
        Lit::Float(float) => {
            let digits = format!("{}{}", sign, float.base10_digits());
            match float.suffix() {
                "f32" => DictValue::F32(parse_number(float, &digits)?),
                _ => DictValue::F64(parse_number(float, &digits)?),
            }
        }
        Lit::Str(s) if !negative => DictValue::String(s.value()),
        Lit::Char(c) if !negative => DictValue::Char(c.value()),
        Lit::Bool(b) if !negative => DictValue::Bool(b.value),
        other => return Err(syn::Error::new_spanned(other, "unsupported backing value")),
    };
    Ok(value)
}

fn parse_number<T>(tokens: &impl ToTokens, digits: &str) -> syn::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    digits
        .parse()
        .map_err(|e| syn::Error::new_spanned(tokens, format!("invalid number {}: {}", digits, e)))
}
