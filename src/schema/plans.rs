//! Computed field plans
//!
//! A computed field is resolved in two phases. At planning time the plan
//! function runs once per field occurrence and records what the computation
//! depends on (bound field arguments), producing a `Step`. At execution time
//! the step is evaluated with the dependencies filled in. Nothing user-written
//! runs during planning, so a plan can be composed into a larger execution
//! graph before any value exists.

use crate::schema::resolver::accessor_to_value;

use async_graphql::dynamic::{Field, FieldFuture, FieldValue, InputValue, TypeRef};
use async_graphql::{Error, Name, Value};
use indexmap::IndexMap;
use std::sync::Arc;

type StepFn = Arc<dyn Fn(&[Value]) -> Result<Value, String> + Send + Sync>;

/// A deferred computation step
#[derive(Clone)]
pub enum Step {
    /// A literal value
    Constant(Value),
    /// A dependency on a bound field argument
    Argument(String),
    /// A function of other steps, run once its inputs are available
    Lambda { inputs: Vec<Step>, run: StepFn },
}

impl Step {
    /// Evaluate the step against the bound arguments of one field occurrence
    pub fn execute(&self, args: &IndexMap<Name, Value>) -> Result<Value, String> {
        match self {
            Step::Constant(value) => Ok(value.clone()),
            Step::Argument(name) => args
                .get(name.as_str())
                .cloned()
                .ok_or_else(|| format!("Argument '{}' was not bound", name)),
            Step::Lambda { inputs, run } => {
                let values = inputs
                    .iter()
                    .map(|step| step.execute(args))
                    .collect::<Result<Vec<_>, _>>()?;
                run(&values)
            }
        }
    }
}

/// Combine steps with a function applied at execution time
pub fn lambda(
    inputs: Vec<Step>,
    run: impl Fn(&[Value]) -> Result<Value, String> + Send + Sync + 'static,
) -> Step {
    Step::Lambda {
        inputs,
        run: Arc::new(run),
    }
}

/// Handed to plan functions during the planning phase
pub struct PlanContext;

impl PlanContext {
    /// A step that resolves to the named field argument
    pub fn argument(&self, name: &str) -> Step {
        Step::Argument(name.to_string())
    }

    /// A step that resolves to a constant
    pub fn constant(&self, value: Value) -> Step {
        Step::Constant(value)
    }
}

type PlanFn = Arc<dyn Fn(&PlanContext) -> Step + Send + Sync>;

/// A computed field: where it hangs, its signature, and its plan
#[derive(Clone)]
pub struct ComputedField {
    pub type_name: String,
    pub field_name: String,
    pub arguments: Vec<(String, TypeRef)>,
    pub returns: TypeRef,
    plan: PlanFn,
}

/// Registry mapping `(type name, field name)` to plan functions, applied once
/// while the schema is built. No runtime re-registration.
#[derive(Clone, Default)]
pub struct PlanRegistry {
    fields: Vec<ComputedField>,
}

impl PlanRegistry {
    /// An empty registry
    pub fn new() -> Self {
        PlanRegistry::default()
    }

    /// The stock registry: `Query.addTwoNumbers`
    pub fn with_defaults() -> Self {
        let mut registry = PlanRegistry::new();
        registry.register(
            "Query",
            "addTwoNumbers",
            vec![
                ("a".to_string(), TypeRef::named_nn(TypeRef::INT)),
                ("b".to_string(), TypeRef::named_nn(TypeRef::INT)),
            ],
            TypeRef::named_nn(TypeRef::INT),
            |plan| {
                let a = plan.argument("a");
                let b = plan.argument("b");
                lambda(vec![a, b], |values| {
                    let (a, b) = (as_int(&values[0])?, as_int(&values[1])?);
                    let sum = a
                        .checked_add(b)
                        .ok_or_else(|| format!("Integer overflow adding {} and {}", a, b))?;
                    Ok(Value::Number(sum.into()))
                })
            },
        );
        registry
    }

    pub fn register(
        &mut self,
        type_name: &str,
        field_name: &str,
        arguments: Vec<(String, TypeRef)>,
        returns: TypeRef,
        plan: impl Fn(&PlanContext) -> Step + Send + Sync + 'static,
    ) {
        self.fields.push(ComputedField {
            type_name: type_name.to_string(),
            field_name: field_name.to_string(),
            arguments,
            returns,
            plan: Arc::new(plan),
        });
    }

    /// Computed fields registered against the given type
    pub fn fields_for<'a>(
        &'a self,
        type_name: &'a str,
    ) -> impl Iterator<Item = &'a ComputedField> + 'a {
        self.fields.iter().filter(move |f| f.type_name == type_name)
    }
}

fn as_int(value: &Value) -> Result<i64, String> {
    match value {
        Value::Number(n) => n.as_i64().ok_or_else(|| format!("Expected integer, got {}", n)),
        other => Err(format!("Expected integer, got {}", other)),
    }
}

impl ComputedField {
    /// Build the dynamic schema field for this computed field.
    ///
    /// Planning happens per occurrence inside the resolver closure; the step
    /// executes inside the field future once arguments are bound.
    pub fn to_field(&self) -> Field {
        let plan = self.plan.clone();
        let argument_names: Vec<String> =
            self.arguments.iter().map(|(name, _)| name.clone()).collect();
        let field_name = self.field_name.clone();

        let mut field = Field::new(self.field_name.as_str(), self.returns.clone(), move |ctx| {
            let plan = plan.clone();
            let argument_names = argument_names.clone();
            let field_name = field_name.clone();

            FieldFuture::new(async move {
                // Planning phase: record the computation shape
                let step = plan(&PlanContext);

                // Bind the declared arguments for the execution phase
                let mut args: IndexMap<Name, Value> = IndexMap::new();
                for name in &argument_names {
                    if let Ok(accessor) = ctx.args.try_get(name) {
                        args.insert(Name::new(name), accessor_to_value(&accessor));
                    }
                }

                // Execution phase
                let value = step
                    .execute(&args)
                    .map_err(|e| Error::new(format!("{}: {}", field_name, e)))?;
                Ok(Some(FieldValue::value(value)))
            })
        });

        for (name, type_ref) in &self.arguments {
            field = field.argument(InputValue::new(name.as_str(), type_ref.clone()));
        }
        field
    }
}
