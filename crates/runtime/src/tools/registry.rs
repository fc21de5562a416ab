//! Fixed, named collection of tools.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use tracing::info;

use super::{BoundModel, RegistryError, Tool};
use crate::model::{Backend, ToolChoice, ToolSpec};

/// Tools available to the model, in registration order.
///
/// Built once at start-up from a static list and passed explicitly to the
/// binder and invoker. Names are unique; lookup is an exact, case-sensitive
/// match.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Build a registry, rejecting duplicate names.
    pub fn new(tools: Vec<Arc<dyn Tool>>) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        for tool in &tools {
            if !seen.insert(tool.name().to_string()) {
                return Err(RegistryError::DuplicateTool(tool.name().to_string()));
            }
        }
        Ok(Self { tools })
    }

    /// A registry with no tools.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Find a tool by exact name.
    pub fn lookup(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|tool| tool.name() == name)
    }

    /// Tool names in registration order.
    pub fn list_names(&self) -> Vec<&str> {
        self.tools.iter().map(|tool| tool.name()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Tool>> {
        self.tools.iter()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Specifications for every tool, in registration order.
    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools.iter().map(|tool| tool.spec()).collect()
    }

    /// Restrict the registry to the named tools, keeping registration order.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Self, RegistryError> {
        if let Some(missing) = names
            .iter()
            .map(AsRef::as_ref)
            .find(|name| self.lookup(name).is_none())
        {
            return Err(RegistryError::UnknownTool(missing.to_string()));
        }

        let tools = self
            .tools
            .iter()
            .filter(|tool| names.iter().any(|name| name.as_ref() == tool.name()))
            .cloned()
            .collect();
        Ok(Self { tools })
    }

    /// Attach tools from this registry to a model handle.
    pub fn bind<B: Backend>(
        &self,
        backend: B,
        options: BindOptions,
    ) -> Result<BoundModel<B>, RegistryError> {
        let tools = match &options.tools {
            Some(names) => self.select(names)?,
            None => self.clone(),
        };

        if let ToolChoice::Forced(name) = &options.tool_choice {
            if tools.lookup(name).is_none() {
                return Err(RegistryError::UnknownTool(name.clone()));
            }
        }

        info!(
            count = tools.len(),
            tools = ?tools.list_names(),
            tool_choice = ?options.tool_choice,
            parallel_tool_calls = options.parallel_tool_calls,
            "Binding tools to model"
        );

        Ok(BoundModel::new(
            backend,
            tools,
            options.tool_choice,
            options.parallel_tool_calls,
        ))
    }
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.list_names()).finish()
    }
}

/// Options for [`ToolRegistry::bind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindOptions {
    /// Subset of tool names to bind; `None` binds every registered tool.
    pub tools: Option<Vec<String>>,
    pub tool_choice: ToolChoice,
    /// Whether the model may emit several tool calls in one turn.
    pub parallel_tool_calls: bool,
}

impl Default for BindOptions {
    fn default() -> Self {
        Self {
            tools: None,
            tool_choice: ToolChoice::Auto,
            parallel_tool_calls: true,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::{ModelError, ModelRequest, ModelResponse};
    use crate::tools::{Arguments, ToolError};
    use serde_json::{Value, json};

    /// Tool that echoes a fixed reply, or fails when configured to.
    pub(crate) struct StubTool {
        pub name: &'static str,
        pub reply: Result<&'static str, &'static str>,
    }

    impl Tool for StubTool {
        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            "stub"
        }

        fn input_schema(&self) -> Value {
            json!({"type": "object", "properties": {}})
        }

        fn invoke(&self, _arguments: &Arguments) -> Result<Value, ToolError> {
            self.reply
                .map(|text| Value::String(text.into()))
                .map_err(|e| ToolError::Execution(e.into()))
        }
    }

    pub(crate) fn stub(name: &'static str) -> Arc<dyn Tool> {
        Arc::new(StubTool {
            name,
            reply: Ok("ok"),
        })
    }

    #[derive(Debug)]
    struct NoBackend;

    impl Backend for NoBackend {
        async fn call(&self, _request: ModelRequest<'_>) -> Result<ModelResponse, ModelError> {
            Err(ModelError::InvalidResponse("unused".into()))
        }
    }

    fn registry() -> ToolRegistry {
        ToolRegistry::new(vec![stub("search_web"), stub("fetch_weather"), stub("calculate_math")])
            .unwrap()
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = ToolRegistry::new(vec![stub("search_web"), stub("search_web")]).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateTool("search_web".into()));
    }

    #[test]
    fn lookup_is_exact_and_case_sensitive() {
        let registry = registry();
        assert!(registry.lookup("fetch_weather").is_some());
        assert!(registry.lookup("Fetch_Weather").is_none());
        assert!(registry.lookup("fetch").is_none());
    }

    #[test]
    fn names_follow_registration_order() {
        assert_eq!(
            registry().list_names(),
            vec!["search_web", "fetch_weather", "calculate_math"]
        );
    }

    #[test]
    fn select_keeps_registration_order() {
        let subset = registry().select(&["calculate_math", "search_web"]).unwrap();
        assert_eq!(subset.list_names(), vec!["search_web", "calculate_math"]);
    }

    #[test]
    fn select_unknown_tool_fails() {
        let err = registry().select(&["delete_files"]).unwrap_err();
        assert_eq!(err, RegistryError::UnknownTool("delete_files".into()));
    }

    #[test]
    fn bind_defaults_to_all_tools() {
        let bound = registry().bind(NoBackend, BindOptions::default()).unwrap();
        assert_eq!(bound.tools().len(), 3);
        assert_eq!(bound.tool_choice(), &ToolChoice::Auto);
        assert!(bound.parallel_tool_calls());
    }

    #[test]
    fn bind_forced_tool_must_be_bound() {
        let options = BindOptions {
            tools: Some(vec!["search_web".into()]),
            tool_choice: ToolChoice::Forced("calculate_math".into()),
            parallel_tool_calls: false,
        };
        let err = registry().bind(NoBackend, options).unwrap_err();
        assert_eq!(err, RegistryError::UnknownTool("calculate_math".into()));
    }
}
