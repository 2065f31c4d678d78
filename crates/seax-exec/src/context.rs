//! The context family and its merge semantics.
//!
//! Contexts form a stack rooted at a global scope. On creation a child
//! copies its outer context's variable bindings and option lists and
//! inherits its path condition and reachability; modifications stay
//! invisible to the outer context until the child is left and merged back.
//! Contexts never hold a pointer to their outer context; the engine owns
//! the whole stack and performs the merges.

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use tracing::debug;

use seax_se::{
    conditionalize, se_not, EngineError, EngineResult, Expr, OptionMap, SeType, ValueOption,
    Variable,
};
use seax_util::{random_ident, ContextId};

use crate::engine::FnSig;

/// Which arm of a conditional statement a branch context executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchSide {
    True,
    False,
}

/// State shared by every context kind.
#[derive(Debug, Clone)]
pub struct ContextData {
    /// Identity of this context; variables remember it as their declaring
    /// scope.
    pub id: ContextId,
    /// Path condition under which this program point is reached.
    pub condition: Expr,
    /// Lexical bindings, name to variable.
    pub refs: IndexMap<String, Variable>,
    /// Conditional values currently known per variable.
    pub options: OptionMap,
    /// Variables mutated inside this context.
    pub updated: FxHashSet<Variable>,
    /// Cleared when a return truncates the path.
    pub is_reachable: bool,
}

impl ContextData {
    fn root() -> Self {
        ContextData {
            id: ContextId::fresh(),
            condition: seax_se::se_true(),
            refs: IndexMap::new(),
            options: IndexMap::new(),
            updated: FxHashSet::default(),
            is_reachable: true,
        }
    }

    fn child(outer: &ContextData) -> Self {
        ContextData {
            id: ContextId::fresh(),
            condition: outer.condition.clone(),
            refs: outer.refs.clone(),
            options: outer.options.clone(),
            updated: FxHashSet::default(),
            is_reachable: outer.is_reachable,
        }
    }

    /// Creates and registers a new variable in this context.
    pub fn create_variable(&mut self, name: &str, se_type: SeType) -> Variable {
        let variable = Variable::new(self.id, name, se_type);
        self.refs.insert(name.to_string(), variable.clone());
        self.options.insert(variable.clone(), Vec::new());
        debug!("variable `{se_type} {name}` created");
        variable
    }

    /// Resolves a variable by name.
    pub fn get_variable_ref(&self, name: &str) -> EngineResult<Variable> {
        self.refs
            .get(name)
            .cloned()
            .ok_or_else(|| EngineError::invariant(format!("cannot find variable: `{name}`")))
    }

    /// Records a new value for `variable` under the current path condition.
    ///
    /// An existing option whose condition equals the path condition is
    /// superseded outright; every other option is narrowed to the case
    /// where the path condition does not hold.
    pub fn update_variable(&mut self, variable: &Variable, value: Expr) -> EngineResult<()> {
        let condition = self.condition.clone();
        let negated = se_not(condition.clone());
        let options = self.options.get_mut(variable).ok_or_else(|| {
            EngineError::invariant(format!("variable `{variable}` is not visible here"))
        })?;

        options.retain_mut(|option| {
            if option.condition == condition {
                false
            } else {
                option.adjunct_condition(negated.clone());
                true
            }
        });

        let option = ValueOption::new(condition, value);
        debug!("value of `{variable}` updated for option `{option}`");
        options.push(option);
        self.updated.insert(variable.clone());
        Ok(())
    }

    /// Replaces tracked variable reads in `expr` by their conditional
    /// values.
    pub fn conditionalize(&self, expr: &Expr) -> Expr {
        conditionalize(&self.options, expr)
    }

    /// Narrows this context's path condition: `condition := condition ∧
    /// extra`. Propagation across the stack is the engine's job.
    pub fn adjunct_condition_local(&mut self, extra: Expr) {
        let condition = std::mem::replace(&mut self.condition, seax_se::se_true());
        self.condition = seax_se::se_and(condition, extra);
    }

    /// Default local merge on leave: the outer context adopts this
    /// context's option list for every variable it can see, and updates
    /// propagate upward.
    pub fn merge_into(&self, outer: &mut ContextData) {
        for variable in outer.refs.values() {
            if let Some(options) = self.options.get(variable) {
                outer.options.insert(variable.clone(), options.clone());
            }
            if self.updated.contains(variable) {
                outer.updated.insert(variable.clone());
            }
        }
    }
}

/// Kind-specific state of a context.
#[derive(Debug)]
pub enum ContextKind {
    Global,
    Function {
        name: String,
        /// Synthetic variable the function's `return` statements assign.
        returned: Variable,
    },
    Block,
    /// A conditional statement owns its two branch contexts. A slot is
    /// empty exactly while that branch sits on the engine's stack.
    Conditional {
        true_branch: Option<Box<Context>>,
        false_branch: Option<Box<Context>>,
    },
    Branch {
        side: BranchSide,
    },
}

/// A lexical scope frame.
#[derive(Debug)]
pub struct Context {
    pub data: ContextData,
    pub kind: ContextKind,
}

impl Context {
    /// The singleton root scope.
    pub fn global() -> Self {
        Context {
            data: ContextData::root(),
            kind: ContextKind::Global,
        }
    }

    /// A function scope: declares the returned variable and the
    /// parameters, and records each call argument as its parameter's
    /// initial option under the inherited path condition.
    pub fn function(outer: &ContextData, sig: &FnSig, args: Vec<Expr>) -> EngineResult<Self> {
        let mut data = ContextData::child(outer);

        let returned = data.create_variable(
            &random_ident(&format!("__{}_ret_", sig.name), 10),
            sig.return_type,
        );

        let parameters: Vec<Variable> = sig
            .params
            .iter()
            .map(|(name, se_type)| data.create_variable(name, *se_type))
            .collect();
        for (parameter, argument) in parameters.iter().zip(args) {
            data.update_variable(parameter, argument)?;
        }

        Ok(Context {
            data,
            kind: ContextKind::Function {
                name: sig.name.clone(),
                returned,
            },
        })
    }

    /// A plain statement block scope.
    pub fn block(outer: &ContextData) -> Self {
        Context {
            data: ContextData::child(outer),
            kind: ContextKind::Block,
        }
    }

    /// A conditional statement scope for an `if` with the given
    /// (already conditionalized) guard. Both branch contexts are built
    /// eagerly so their path conditions capture the state at the `if`.
    pub fn conditional(outer: &ContextData, guard: Expr) -> Self {
        let data = ContextData::child(outer);
        let true_branch = Context::branch(&data, guard.clone(), BranchSide::True);
        let false_branch = Context::branch(&data, se_not(guard), BranchSide::False);
        Context {
            kind: ContextKind::Conditional {
                true_branch: Some(Box::new(true_branch)),
                false_branch: Some(Box::new(false_branch)),
            },
            data,
        }
    }

    fn branch(outer: &ContextData, guard: Expr, side: BranchSide) -> Self {
        let mut data = ContextData::child(outer);
        data.adjunct_condition_local(guard);
        Context {
            data,
            kind: ContextKind::Branch { side },
        }
    }

    /// Kind name for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            ContextKind::Global => "global",
            ContextKind::Function { .. } => "function",
            ContextKind::Block => "block",
            ContextKind::Conditional { .. } => "conditional",
            ContextKind::Branch { .. } => "branch",
        }
    }

    /// Merges the two branches back into this conditional context after
    /// both arms ran (or were skipped).
    ///
    /// Where both branches rewrote a variable the options inherited from
    /// this context no longer hold, so they are stripped (matched by
    /// option identity) from both branch lists before the lists are
    /// appended. A variable rewritten by a single branch adopts that
    /// branch's list wholesale; its inherited options already carry the
    /// `∧ ¬branch-condition` narrowing from the update rule.
    pub fn merge_branches(&mut self) -> EngineResult<()> {
        let (true_branch, false_branch) = match &mut self.kind {
            ContextKind::Conditional {
                true_branch,
                false_branch,
            } => (true_branch.take(), false_branch.take()),
            _ => {
                return Err(EngineError::invariant(
                    "branch merge outside a conditional context",
                ))
            }
        };
        let mut true_branch = true_branch
            .ok_or_else(|| EngineError::invariant("true branch missing at conditional merge"))?;
        let mut false_branch = false_branch
            .ok_or_else(|| EngineError::invariant("false branch missing at conditional merge"))?;

        let variables: Vec<Variable> = self.data.refs.values().cloned().collect();
        for variable in &variables {
            let in_true = true_branch.data.updated.contains(variable);
            let in_false = false_branch.data.updated.contains(variable);

            if in_true && in_false {
                let inherited: Vec<_> = self
                    .data
                    .options
                    .get(variable)
                    .map(|options| options.iter().map(|option| option.id).collect())
                    .unwrap_or_default();
                for branch in [&mut true_branch, &mut false_branch] {
                    if let Some(options) = branch.data.options.get_mut(variable) {
                        options.retain(|option| !inherited.contains(&option.id));
                    }
                }
            }

            if in_true || in_false {
                let mut merged = Vec::new();
                if in_true {
                    if let Some(options) = true_branch.data.options.get(variable) {
                        merged.extend(options.iter().cloned());
                    }
                }
                if in_false {
                    if let Some(options) = false_branch.data.options.get(variable) {
                        merged.extend(options.iter().cloned());
                    }
                }
                self.data.options.insert(variable.clone(), merged);
                self.data.updated.insert(variable.clone());
            }
        }

        Ok(())
    }
}
