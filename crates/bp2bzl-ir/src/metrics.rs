use std::collections::BTreeMap;

use tracing::info;

use crate::mode::CodegenMode;

/// Counters collected while converting modules to targets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodegenMetrics {
    /// Generated targets per rule class
    pub rule_class_count: BTreeMap<String, u64>,
    /// Names of converted modules, sorted
    pub converted_modules: Vec<String>,
    /// Modules with no destination rule (bp2build only)
    pub unconverted_module_count: u64,
    /// Directories carrying hand-maintained content
    pub handcrafted_target_count: u64,
}

impl CodegenMetrics {
    pub fn record_converted(&mut self, module_name: &str, rule_class: &str) {
        *self
            .rule_class_count
            .entry(rule_class.to_string())
            .or_default() += 1;
        self.converted_modules.push(module_name.to_string());
    }

    pub fn record_unconverted(&mut self) {
        self.unconverted_module_count += 1;
    }

    pub fn record_handcrafted(&mut self) {
        self.handcrafted_target_count += 1;
    }

    pub fn generated_target_count(&self) -> u64 {
        self.rule_class_count.values().sum()
    }

    /// Newline-separated converted module names.
    pub fn converted_modules_listing(&self) -> String {
        self.converted_modules.join("\n")
    }

    pub(crate) fn finish(&mut self) {
        self.converted_modules.sort();
    }

    /// Emit a one-line summary plus per-rule-class counts.
    pub fn log_summary(&self, mode: CodegenMode) {
        info!(
            %mode,
            generated = self.generated_target_count(),
            unconverted = self.unconverted_module_count,
            handcrafted = self.handcrafted_target_count,
            "conversion finished"
        );
        for (rule_class, count) in &self.rule_class_count {
            info!(rule_class = rule_class.as_str(), count, "targets by rule class");
        }
    }
}
