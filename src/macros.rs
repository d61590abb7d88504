//! Normalization of VBA module source before it is printed.

use regex::{NoExpand, Regex};

const VB_BASE_PLACEHOLDER: &str = "Attribute VB_Base = \"0{XXX}{XXX}\"";

pub struct MacroNormalizer {
    vb_base: Regex,
    declaration: Regex,
}

impl MacroNormalizer {
    pub fn new() -> Self {
        Self {
            vb_base: Regex::new(r#"(?m)^Attribute VB_Base = "0\{[^}]+\}\{[^}]+\}"$"#)
                .expect("VB_Base pattern is valid"),
            declaration: Regex::new(
                r"(?m)((?:Private|Public|) (?:Function|Sub) )([^(]+\([^)]*\).*)$",
            )
            .expect("declaration pattern is valid"),
        }
    }

    /// Make module source diffable across workbooks.
    ///
    /// Line endings become `\n`, the per-file `VB_Base` identifiers are masked,
    /// and every `Sub`/`Function` declaration gets `<module>::` in front of the
    /// routine name.
    pub fn normalize(&self, module_name: &str, source: &str) -> String {
        let source = source.replace("\r\n", "\n");
        let source = self
            .vb_base
            .replace_all(&source, NoExpand(VB_BASE_PLACEHOLDER));
        self.declaration
            .replace_all(&source, |caps: &regex::Captures| {
                format!("{}{}::{}", &caps[1], module_name, &caps[2])
            })
            .into_owned()
    }
}

impl Default for MacroNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
