// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use syn::meta::ParseNestedMeta;
use syn::{Attribute, LitStr};

/// Marker kind selected by a `#[bind(...)]` option.
#[derive(Debug, Clone)]
pub enum MarkerOption {
    /// `resource`
    Resource,
    /// `inject`
    Inject,
    /// `named`
    Named,
    /// `binding = "<mode>"`
    Binding,
    /// `marker = "<kind>"`
    Custom(LitStr),
}

/// Parsed `#[bind(...)]` options of one field.
#[derive(Debug, Default)]
#[expect(clippy::struct_excessive_bools, reason = "one flag per bind option")]
pub struct FieldOptions {
    /// The field embeds the ancestor object.
    pub parent: bool,

    /// The field is not reported at all.
    pub skip: bool,

    /// The slot is reported as a property rather than an attribute.
    pub property: bool,

    /// The attribute is marked static.
    pub is_static: bool,

    /// The attribute is marked constant.
    pub is_constant: bool,

    /// Marker kind attached to the slot.
    pub marker: Option<MarkerOption>,

    /// Explicit component name for the marker.
    pub name: Option<LitStr>,

    /// Binding mode given by `binding = "<mode>"`.
    pub mode: Option<LitStr>,
}

impl FieldOptions {
    /// Whether any option other than `parent` and `skip` was given.
    #[must_use]
    pub fn describes_slot(&self) -> bool {
        self.property || self.is_static || self.is_constant || self.marker.is_some() || self.name.is_some()
    }
}

/// Parses every `#[bind(...)]` attribute of a field into one set of options.
#[expect(clippy::missing_errors_doc, reason = "syn::internal API, no need for docs")]
pub fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldOptions> {
    let mut options = FieldOptions::default();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("bind")) {
        attr.parse_nested_meta(|meta| parse_option(&mut options, &meta))?;
    }

    if options.parent && (options.skip || options.describes_slot()) {
        return Err(syn::Error::new_spanned(
            attrs.iter().find(|attr| attr.path().is_ident("bind")),
            "`parent` cannot be combined with other bind options",
        ));
    }

    if options.skip && options.describes_slot() {
        return Err(syn::Error::new_spanned(
            attrs.iter().find(|attr| attr.path().is_ident("bind")),
            "`skip` cannot be combined with other bind options",
        ));
    }

    if let Some(name) = &options.name
        && options.marker.is_none()
    {
        return Err(syn::Error::new_spanned(name, "`name` needs a marker such as `resource` or `named`"));
    }

    Ok(options)
}

fn parse_option(options: &mut FieldOptions, meta: &ParseNestedMeta<'_>) -> syn::Result<()> {
    let path = &meta.path;

    if path.is_ident("parent") {
        set_flag(&mut options.parent, meta, "parent")
    } else if path.is_ident("skip") {
        set_flag(&mut options.skip, meta, "skip")
    } else if path.is_ident("property") {
        set_flag(&mut options.property, meta, "property")
    } else if path.is_ident("static") {
        set_flag(&mut options.is_static, meta, "static")
    } else if path.is_ident("constant") {
        set_flag(&mut options.is_constant, meta, "constant")
    } else if path.is_ident("resource") {
        set_marker(options, meta, MarkerOption::Resource)
    } else if path.is_ident("inject") {
        set_marker(options, meta, MarkerOption::Inject)
    } else if path.is_ident("named") {
        set_marker(options, meta, MarkerOption::Named)
    } else if path.is_ident("binding") {
        if meta.input.peek(syn::Token![=]) {
            options.mode = Some(meta.value()?.parse()?);
        }
        set_marker(options, meta, MarkerOption::Binding)
    } else if path.is_ident("marker") {
        let kind: LitStr = meta.value()?.parse()?;
        if kind.value().is_empty() {
            return Err(syn::Error::new_spanned(kind, "a marker kind cannot be empty"));
        }
        set_marker(options, meta, MarkerOption::Custom(kind))
    } else if path.is_ident("name") {
        if options.name.is_some() {
            return Err(meta.error("duplicate `name`"));
        }
        options.name = Some(meta.value()?.parse()?);
        Ok(())
    } else {
        Err(meta.error(
            "unknown bind option (expected one of `parent`, `skip`, `property`, `static`, `constant`, \
             `resource`, `inject`, `named`, `binding`, `marker`, `name`)",
        ))
    }
}

fn set_flag(flag: &mut bool, meta: &ParseNestedMeta<'_>, option: &str) -> syn::Result<()> {
    if *flag {
        return Err(meta.error(format!("duplicate `{option}`")));
    }

    *flag = true;
    Ok(())
}

fn set_marker(options: &mut FieldOptions, meta: &ParseNestedMeta<'_>, marker: MarkerOption) -> syn::Result<()> {
    if options.marker.is_some() {
        return Err(meta.error("a field carries at most one marker"));
    }

    options.marker = Some(marker);
    Ok(())
}
