// ABOUTME: Tree-walking evaluator executing a parsed program

use crate::ast::{BinaryOp, Expression, Program, Statement};
use crate::env::{Environment, SaveSlots};
use crate::error::EvalError;
use crate::libraries::{self, Dispatch};
use crate::value::{to_display_string, to_number, RxObject, Value};
use std::collections::HashMap;
use std::collections::HashSet;

#[cfg(debug_assertions)]
use crate::config::WHILE_SAFETY_CAP;

#[derive(Debug, Clone)]
struct UserFunction {
    parameters: Vec<String>,
    body: Vec<Statement>,
}

/// Holds all mutable interpreter state: bindings, the save-slot side
/// channel, the function table, and which libraries have been imported.
/// There is no global or thread-local state anywhere in this crate — every
/// piece of mutable state lives on an instance, so two interpreters never
/// interfere with each other.
pub struct Interpreter {
    environment: Environment,
    save_slots: SaveSlots,
    functions: HashMap<String, UserFunction>,
    imported_libraries: HashSet<String>,
    return_flag: bool,
    return_value: Value,
    anon_counter: u64,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self {
            environment: Environment::new(),
            save_slots: SaveSlots::new(),
            functions: HashMap::new(),
            imported_libraries: HashSet::new(),
            return_flag: false,
            return_value: Value::Number(0.0),
            anon_counter: 0,
        }
    }

    /// Builds an interpreter with the given libraries pre-imported, without
    /// needing `Import` statements in the source (used by embedders and
    /// tests).
    pub fn with_libraries(names: &[&str]) -> Self {
        let mut interp = Self::new();
        for name in names {
            interp.imported_libraries.insert((*name).to_string());
        }
        interp
    }

    pub fn interpret(&mut self, program: &Program) -> Result<(), EvalError> {
        self.execute_block(program)
    }

    /// Reads a top-level binding. Exposed for embedders and tests that want
    /// to inspect interpreter state without writing an rx script to do it.
    pub fn environment_value(&self, name: &str) -> Option<Value> {
        self.environment.get(name).cloned()
    }

    fn next_anon_name(&mut self, prefix: &str) -> String {
        self.anon_counter += 1;
        format!("__{prefix}_{}", self.anon_counter)
    }

    // -- statements -----------------------------------------------------------

    fn execute_block(&mut self, statements: &[Statement]) -> Result<(), EvalError> {
        for statement in statements {
            if self.return_flag {
                break;
            }
            self.execute(statement)?;
        }
        Ok(())
    }

    fn execute(&mut self, statement: &Statement) -> Result<(), EvalError> {
        if self.return_flag {
            return Ok(());
        }
        match statement {
            Statement::ExprStmt(expr) => {
                self.evaluate(expr)?;
                Ok(())
            }
            Statement::Assign { name, value } | Statement::NewVariable { name, value } => {
                let value = self.evaluate(value)?;
                self.environment.bind(name.clone(), value);
                Ok(())
            }
            Statement::If { condition, then_block, else_block } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute_block(then_block)
                } else if let Some(else_block) = else_block {
                    self.execute_block(else_block)
                } else {
                    Ok(())
                }
            }
            Statement::While { condition, body } => {
                #[cfg(debug_assertions)]
                let mut iterations: u64 = 0;

                while self.evaluate(condition)?.is_truthy() && !self.return_flag {
                    self.execute_block(body)?;

                    #[cfg(debug_assertions)]
                    {
                        iterations += 1;
                        if iterations >= WHILE_SAFETY_CAP {
                            break;
                        }
                    }
                }
                Ok(())
            }
            Statement::FunctionDecl { name, parameters, body } => {
                self.functions.insert(
                    name.clone(),
                    UserFunction { parameters: parameters.clone(), body: body.clone() },
                );
                Ok(())
            }
            Statement::Return(value) => {
                self.return_value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Number(0.0),
                };
                self.return_flag = true;
                Ok(())
            }
            Statement::SystemCall(command) => {
                let command = self.evaluate(command)?;
                let cmd_str = to_display_string(&command);
                let status = std::process::Command::new("sh").arg("-c").arg(&cmd_str).status();
                if let Ok(status) = status {
                    if !status.success() {
                        let code = status.code().unwrap_or(-1);
                        println!("command exited with code: {code}");
                    }
                }
                Ok(())
            }
            Statement::Import(name) => {
                self.imported_libraries.insert(name.clone());
                Ok(())
            }
            Statement::Save(name) => {
                self.save_slots.declare(name.clone());
                Ok(())
            }
            Statement::Message { slot, value } => {
                let value = self.evaluate(value)?;
                self.save_slots.set(slot.clone(), value);
                Ok(())
            }
        }
    }

    // -- expressions ------------------------------------------------------------

    fn evaluate(&mut self, expr: &Expression) -> Result<Value, EvalError> {
        match expr {
            Expression::Number(n) => Ok(Value::Number(*n)),
            Expression::String(s) => Ok(Value::String(s.clone())),
            Expression::ColorString { color, text } => {
                Ok(Value::String(libraries::colors::render_color_literal(color, text)))
            }
            Expression::Array(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(self.evaluate(item)?);
                }
                Ok(Value::array(values))
            }
            Expression::Object(entries) => self.evaluate_object(entries),
            Expression::Function { parameters, body } => {
                let name = self.next_anon_name("lambda");
                self.functions.insert(
                    name.clone(),
                    UserFunction { parameters: parameters.clone(), body: body.clone() },
                );
                Ok(Value::FunctionRef(name))
            }
            Expression::Identifier(name) => {
                if let Some(value) = self.save_slots.get(name) {
                    return Ok(value.clone());
                }
                self.environment
                    .get(name)
                    .cloned()
                    .ok_or_else(|| EvalError::UndefinedVariable(name.clone()))
            }
            Expression::Member { object, property } => {
                let object = self.evaluate(object)?;
                match &object {
                    Value::Object(obj) => obj
                        .get(property)
                        .cloned()
                        .ok_or_else(|| EvalError::MissingProperty { property: property.clone() }),
                    Value::Array(_) if property == "value" => Ok(object),
                    other => Err(EvalError::type_error(
                        "member access",
                        "object",
                        other.type_name(),
                    )),
                }
            }
            Expression::Index { object, index } => {
                let object = self.evaluate(object)?;
                let index = self.evaluate(index)?;
                match &object {
                    Value::Array(items) => {
                        let idx = to_number(&index) as i64;
                        if idx >= 0 && (idx as usize) < items.len() {
                            Ok(items[idx as usize].clone())
                        } else {
                            Err(EvalError::IndexOutOfBounds { index: idx, length: items.len() })
                        }
                    }
                    other => Err(EvalError::type_error("indexing", "array", other.type_name())),
                }
            }
            Expression::Binary { left, op, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                self.evaluate_binary(op, left, right)
            }
            Expression::Call { function, arguments } => {
                let mut args = Vec::with_capacity(arguments.len());
                for arg in arguments {
                    args.push(self.evaluate(arg)?);
                }
                self.call_function(function, args)
            }
            Expression::MethodCall { receiver, method, arguments } => {
                let receiver = self.evaluate(receiver)?;
                let mut args = Vec::with_capacity(arguments.len());
                for arg in arguments {
                    args.push(self.evaluate(arg)?);
                }
                self.call_method(receiver, method, args)
            }
            Expression::Typeof(inner) => {
                let value = self.evaluate(inner)?;
                Ok(Value::String(value.type_name().to_string()))
            }
            Expression::Interpolation(parts) => {
                let mut out = String::new();
                for part in parts {
                    out.push_str(&to_display_string(&self.evaluate(part)?));
                }
                Ok(Value::String(out))
            }
        }
    }

    fn evaluate_object(&mut self, entries: &[(String, Expression)]) -> Result<Value, EvalError> {
        let mut obj = RxObject::new();
        for (key, value_expr) in entries {
            if let Expression::Function { parameters, body } = value_expr {
                let name = self.next_anon_name(&format!("obj_method_{key}"));
                self.functions.insert(
                    name.clone(),
                    UserFunction { parameters: parameters.clone(), body: body.clone() },
                );
                obj.insert(key.clone(), Value::FunctionRef(name));
            } else {
                let value = self.evaluate(value_expr)?;
                obj.insert(key.clone(), value);
            }
        }
        Ok(Value::object(obj))
    }

    fn evaluate_binary(&self, op: &BinaryOp, left: Value, right: Value) -> Result<Value, EvalError> {
        match op {
            BinaryOp::Add => {
                if matches!(left, Value::String(_)) || matches!(right, Value::String(_)) {
                    Ok(Value::String(format!(
                        "{}{}",
                        to_display_string(&left),
                        to_display_string(&right)
                    )))
                } else {
                    Ok(Value::Number(to_number(&left) + to_number(&right)))
                }
            }
            BinaryOp::Sub => Ok(Value::Number(to_number(&left) - to_number(&right))),
            BinaryOp::Mul => Ok(Value::Number(to_number(&left) * to_number(&right))),
            BinaryOp::Div => {
                let divisor = to_number(&right);
                if divisor == 0.0 {
                    Err(EvalError::DivisionByZero)
                } else {
                    Ok(Value::Number(to_number(&left) / divisor))
                }
            }
            BinaryOp::Mod => {
                let divisor = to_number(&right);
                if divisor == 0.0 {
                    Err(EvalError::DivisionByZero)
                } else {
                    Ok(Value::Number(to_number(&left) % divisor))
                }
            }
            BinaryOp::Eq => Ok(bool_value(to_display_string(&left) == to_display_string(&right))),
            BinaryOp::NotEq => Ok(bool_value(to_display_string(&left) != to_display_string(&right))),
            BinaryOp::Less => Ok(bool_value(to_number(&left) < to_number(&right))),
            BinaryOp::Greater => Ok(bool_value(to_number(&left) > to_number(&right))),
            BinaryOp::LessEq => Ok(bool_value(to_number(&left) <= to_number(&right))),
            BinaryOp::GreaterEq => Ok(bool_value(to_number(&left) >= to_number(&right))),
        }
    }

    // -- calls --------------------------------------------------------------

    fn call_function(&mut self, name: &str, args: Vec<Value>) -> Result<Value, EvalError> {
        if matches!(name, "print" | "ifu" | "ec") {
            return match libraries::system::dispatch(name, &args) {
                Dispatch::Handled(result) => result,
                Dispatch::NotFound => unreachable!("system primitive names are fixed"),
            };
        }

        for library in self.imported_libraries.iter() {
            let dispatch = match library.as_str() {
                "math" => libraries::math::dispatch(name, &args),
                "colors" => libraries::colors::dispatch(name, &args),
                "time" => libraries::time::dispatch(name, &args),
                _ => Dispatch::NotFound,
            };
            if let Dispatch::Handled(result) = dispatch {
                return result;
            }
        }

        self.call_user_function(name, args)
    }

    fn call_user_function(&mut self, name: &str, args: Vec<Value>) -> Result<Value, EvalError> {
        let function = self
            .functions
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::UndefinedFunction(name.to_string()))?;

        if args.len() != function.parameters.len() {
            return Err(EvalError::arity(name, function.parameters.len(), args.len()));
        }

        let env_snapshot = self.environment.snapshot();
        let saved_return_flag = self.return_flag;
        let saved_return_value = self.return_value.clone();

        for (param, arg) in function.parameters.iter().zip(args) {
            self.environment.bind(param.clone(), arg);
        }
        self.return_flag = false;
        self.return_value = Value::Number(0.0);

        self.execute_block(&function.body)?;

        let result = self.return_value.clone();
        self.environment.restore(env_snapshot);
        self.return_flag = saved_return_flag;
        self.return_value = saved_return_value;

        Ok(result)
    }

    fn call_method(&mut self, receiver: Value, method: &str, args: Vec<Value>) -> Result<Value, EvalError> {
        let Value::Object(obj) = &receiver else {
            return Err(EvalError::type_error("method call", "object", receiver.type_name()));
        };
        let Some(Value::FunctionRef(function_name)) = obj.get(method).cloned() else {
            return Err(EvalError::MissingProperty { property: method.to_string() });
        };

        let env_snapshot = self.environment.snapshot();
        for (key, value) in obj.iter() {
            if key != method {
                self.environment.bind(key.clone(), value.clone());
            }
        }

        let result = self.call_function(&function_name, args);

        // Property writes made during the call are discarded along with the
        // rest of the snapshot: the receiver itself is never written back.
        self.environment.restore(env_snapshot);
        result
    }
}

fn bool_value(b: bool) -> Value {
    Value::Number(if b { 1.0 } else { 0.0 })
}
