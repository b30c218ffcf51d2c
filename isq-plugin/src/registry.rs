//! Plugin Registry

use crate::{EvalContext, FunctionMeta, FunctionPlugin};
use isq_core::{codes, IsqError};
use serde_json::{json, Value as JsonValue};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Central plugin registry
pub struct PluginRegistry {
    functions: HashMap<String, Arc<dyn FunctionPlugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    pub fn with_function<F: FunctionPlugin + 'static>(mut self, f: F) -> Self {
        let name = f.meta().name.to_lowercase();
        self.functions.insert(name, Arc::new(f));
        self
    }

    pub fn get_function(&self, name: &str) -> Option<&dyn FunctionPlugin> {
        self.functions.get(&name.to_lowercase()).map(|f| f.as_ref())
    }

    /// Sorted function names
    pub fn function_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Metadata of every function, sorted by name
    pub fn metas(&self) -> Vec<FunctionMeta> {
        let mut metas: Vec<FunctionMeta> = self.functions.values().map(|f| f.meta()).collect();
        metas.sort_by_key(|m| m.name);
        metas
    }

    pub fn call_function(&self, name: &str, args: &[JsonValue], ctx: &mut EvalContext) -> Result<JsonValue, IsqError> {
        let f = match self.get_function(name) {
            Some(f) => f,
            None => {
                // Find similar function names for better error message
                let similar = self.find_similar_functions(name);
                let mut err = IsqError::undefined_func(name);
                if !similar.is_empty() {
                    let suggestions: Vec<&str> = similar.iter().take(5).map(|s| s.as_str()).collect();
                    err = err.with_suggestion(format!(
                        "Similar: {}. Use help() for full list.",
                        suggestions.join(", ")
                    ));
                }
                return Err(err);
            }
        };

        let meta = f.meta();
        let result = if args.len() < meta.required_args() || args.len() > meta.args.len() {
            Err(IsqError::arg_count(meta.name, meta.required_args(), args.len()))
        } else {
            f.call(args, ctx).map_err(|e| e.in_operation(meta.name))
        };

        match &result {
            Ok(value) => ctx.record_trace(meta.name, args, value.clone(), true),
            Err(e) => ctx.record_trace(meta.name, args, e.to_json(), false),
        }
        result
    }

    /// Find function names similar to the given name (for error suggestions)
    fn find_similar_functions(&self, name: &str) -> Vec<String> {
        let name_lower = name.to_lowercase();
        let mut matches: Vec<(String, usize)> = self.functions.keys()
            .filter_map(|func_name| {
                let score = Self::similarity_score(&name_lower, func_name);
                if score > 0 {
                    Some((func_name.clone(), score))
                } else {
                    None
                }
            })
            .collect();

        // Higher score first, then alphabetical for stable output
        matches.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        matches.into_iter().map(|(name, _)| name).collect()
    }

    fn similarity_score(query: &str, candidate: &str) -> usize {
        let mut score = 0;

        if candidate.starts_with(query) {
            score += 100;
        } else if candidate.contains(query) {
            score += 50;
        } else if query.contains(candidate) {
            score += 30;
        }

        let query_chars: std::collections::HashSet<char> = query.chars().collect();
        let candidate_chars: std::collections::HashSet<char> = candidate.chars().collect();
        let common = query_chars.intersection(&candidate_chars).count();
        // A couple of shared letters is noise
        if common >= 3 {
            score += common * 2;
        }

        let len_diff = (query.len() as i32 - candidate.len() as i32).unsigned_abs() as usize;
        if len_diff < 5 && score > 0 {
            score += 5 - len_diff;
        }

        score
    }

    pub fn help(&self, name: Option<&str>) -> Result<JsonValue, IsqError> {
        match name {
            Some(n) => self.help_for(n),
            None => Ok(self.general_help()),
        }
    }

    fn help_for(&self, name: &str) -> Result<JsonValue, IsqError> {
        match self.get_function(name) {
            Some(f) => Ok(Self::function_to_help(&f.meta())),
            None => Err(IsqError::new(codes::NOT_FOUND, format!("No function named '{}'", name))),
        }
    }

    fn general_help(&self) -> JsonValue {
        let mut funcs_by_cat: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for meta in self.metas() {
            funcs_by_cat.entry(meta.category).or_default().push(meta.name);
        }
        json!({
            "functions": funcs_by_cat,
            "usage": "Call help('function_name') for detailed help.",
        })
    }

    fn function_to_help(meta: &FunctionMeta) -> JsonValue {
        json!({
            "name": meta.name,
            "type": "function",
            "description": meta.description,
            "usage": meta.usage,
            "returns": meta.returns,
            "category": meta.category,
            "args": meta.args,
            "examples": meta.examples,
            "related": meta.related,
        })
    }

    pub fn list_functions(&self, category: Option<&str>) -> JsonValue {
        let funcs: Vec<JsonValue> = self.metas().iter()
            .filter(|m| category.map_or(true, |c| m.category == c))
            .map(|m| json!({
                "name": m.name,
                "description": m.description,
                "usage": m.usage,
                "category": m.category,
            }))
            .collect();
        JsonValue::Array(funcs)
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}
