//! The catalog of built-in rules.

/// Description of one built-in rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleInfo {
    /// Rule name as written in rule strings.
    pub name: &'static str,
    /// Alternative names.
    pub aliases: &'static [&'static str],
    /// Parameter syntax, empty for none.
    pub params: &'static str,
    /// What the rule checks.
    pub description: &'static str,
    /// A complete, valid rule segment.
    pub example: &'static str,
}

const fn info(
    name: &'static str,
    aliases: &'static [&'static str],
    params: &'static str,
    description: &'static str,
    example: &'static str,
) -> RuleInfo {
    RuleInfo {
        name,
        aliases,
        params,
        description,
        example,
    }
}

const CATALOG: &[RuleInfo] = &[
    info("required", &[], "", "Value must be present and not empty", "required"),
    info("nullable", &[], "", "Null is accepted", "nullable"),
    info("sometimes", &[], "", "Validate only when the key is in the input", "sometimes"),
    info("filled", &[], "", "Must not be empty when present", "filled"),
    info("present", &[], "", "Key must exist in the input", "present"),
    info(
        "required_with",
        &[],
        "field,...",
        "Required when any listed field is present",
        "required_with:buildingNumber",
    ),
    info(
        "required_without",
        &[],
        "field,...",
        "Required when any listed field is missing",
        "required_without:email",
    ),
    info(
        "required_if",
        &[],
        "field,value,...",
        "Required when the field equals one of the values",
        "required_if:kind,company",
    ),
    info(
        "required_unless",
        &[],
        "field,value,...",
        "Required unless the field equals one of the values",
        "required_unless:kind,person",
    ),
    info("string", &[], "", "Must be a string", "string"),
    info("numeric", &[], "", "Must be a number (numeric strings are converted)", "numeric"),
    info("integer", &["int"], "", "Must be an integer", "integer"),
    info("float", &["double"], "", "Must be a number", "float"),
    info("boolean", &["bool"], "", "Must be a boolean (literals are converted)", "boolean"),
    info("array", &[], "", "Must be a list or map", "array"),
    info("mixed", &[], "", "Accepts any value", "mixed"),
    info("email", &[], "", "Must be an email address", "email"),
    info("url", &[], "", "Must be an http or https URL", "url"),
    info("uuid", &[], "", "Must be a UUID", "uuid"),
    info("alpha", &[], "", "Letters only", "alpha"),
    info("alpha_num", &[], "", "Letters and digits only", "alpha_num"),
    info("alpha_dash", &[], "", "Letters, digits, dashes and underscores only", "alpha_dash"),
    info("regex", &[], "/pattern/flags", "Must match the pattern", "regex:/^[A-Z]{2}$/i"),
    info("not_regex", &[], "/pattern/flags", "Must not match the pattern", "not_regex:/\\s/"),
    info("min", &[], "n", "Size at least n", "min:1"),
    info("max", &[], "n", "Size at most n", "max:255"),
    info("between", &[], "min,max", "Size within the inclusive range", "between:1,10"),
    info("size", &[], "n", "Size exactly n", "size:2"),
    info("in", &[], "value,...", "Must be one of the values", "in:draft,published"),
    info("not_in", &[], "value,...", "Must not be one of the values", "not_in:admin,root"),
    info("starts_with", &[], "prefix,...", "Must start with one of the prefixes", "starts_with:+"),
    info("ends_with", &[], "suffix,...", "Must end with one of the suffixes", "ends_with:.com"),
    info("same", &[], "field", "Must equal the other field", "same:password"),
    info("different", &[], "field", "Must differ from the other field", "different:old_password"),
    info("confirmed", &[], "", "Must equal `{field}_confirmation`", "confirmed"),
];

/// Returns every built-in rule, in catalog order.
#[must_use]
pub fn rule_catalog() -> &'static [RuleInfo] {
    CATALOG
}

/// Looks up a rule by name or alias.
#[must_use]
pub fn lookup(name: &str) -> Option<&'static RuleInfo> {
    CATALOG
        .iter()
        .find(|info| info.name == name || info.aliases.contains(&name))
}
