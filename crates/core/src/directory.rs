use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::domain::employee::{Employee, EmployeeId, Gender};
use crate::errors::DomainError;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("could not read roster file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse roster file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("roster validation failed: {0}")]
    Validation(String),
}

/// Static lookup table of employee records. Read-only after construction;
/// listing order is roster order.
#[derive(Clone, Debug)]
pub struct EmployeeDirectory {
    employees: Vec<Employee>,
}

#[derive(Debug, Deserialize)]
struct RosterFile {
    #[serde(default)]
    employees: Vec<RosterEmployee>,
}

#[derive(Debug, Deserialize)]
struct RosterEmployee {
    id: String,
    name: String,
    department: String,
    role: String,
    email: String,
    gender: Gender,
    manager_id: Option<String>,
}

impl EmployeeDirectory {
    pub fn new(employees: Vec<Employee>) -> Result<Self, RosterError> {
        let directory = Self { employees };
        directory.validate()?;
        Ok(directory)
    }

    /// The built-in sample roster.
    pub fn seeded() -> Self {
        let seed = |id: &str,
                    name: &str,
                    department: &str,
                    role: &str,
                    email: &str,
                    gender: Gender,
                    manager: Option<&str>| Employee {
            id: EmployeeId::new(id),
            name: name.to_owned(),
            department: department.to_owned(),
            role: role.to_owned(),
            email: email.to_owned(),
            gender,
            manager_id: manager.map(EmployeeId::new),
        };
        Self {
            employees: vec![
                seed(
                    "E001",
                    "Alice Johnson",
                    "Engineering",
                    "Software Engineer",
                    "alice.johnson@company.com",
                    Gender::Female,
                    Some("E003"),
                ),
                seed(
                    "E002",
                    "Bob Smith",
                    "Marketing",
                    "Marketing Analyst",
                    "bob.smith@company.com",
                    Gender::Male,
                    Some("E004"),
                ),
                seed(
                    "E003",
                    "Carol Williams",
                    "Engineering",
                    "Engineering Manager",
                    "carol.williams@company.com",
                    Gender::Female,
                    None,
                ),
                seed(
                    "E004",
                    "David Brown",
                    "HR",
                    "HR Manager",
                    "david.brown@company.com",
                    Gender::Male,
                    None,
                ),
                seed(
                    "E005",
                    "Eva Martinez",
                    "Finance",
                    "Financial Analyst",
                    "eva.martinez@company.com",
                    Gender::Female,
                    Some("E004"),
                ),
            ],
        }
    }

    pub fn from_toml_str(raw: &str, origin: &Path) -> Result<Self, RosterError> {
        let roster: RosterFile = toml::from_str(raw)
            .map_err(|source| RosterError::ParseFile { path: origin.to_path_buf(), source })?;
        Self::new(roster.into_employees())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, RosterError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|source| RosterError::ReadFile { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&raw, path)
    }

    fn validate(&self) -> Result<(), RosterError> {
        if self.employees.is_empty() {
            return Err(RosterError::Validation("roster contains no employees".to_owned()));
        }
        for (index, employee) in self.employees.iter().enumerate() {
            if employee.name.trim().is_empty() {
                return Err(RosterError::Validation(format!(
                    "employee `{}` has an empty name",
                    employee.id
                )));
            }
            if self.employees[..index].iter().any(|other| other.id == employee.id) {
                return Err(RosterError::Validation(format!(
                    "duplicate employee id `{}`",
                    employee.id
                )));
            }
        }
        for employee in &self.employees {
            if let Some(manager_id) = &employee.manager_id {
                if !self.employees.iter().any(|other| &other.id == manager_id) {
                    return Err(RosterError::Validation(format!(
                        "employee `{}` references unknown manager `{manager_id}`",
                        employee.id
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn lookup(&self, id: &str) -> Result<&Employee, DomainError> {
        let id = EmployeeId::new(id);
        self.employees
            .iter()
            .find(|employee| employee.id == id)
            .ok_or(DomainError::EmployeeNotFound { employee_id: id.0 })
    }

    /// Case-insensitive name resolution: an exact match wins; otherwise a
    /// unique prefix match; multiple candidates are a disambiguation error.
    pub fn lookup_by_name(&self, name: &str) -> Result<&Employee, DomainError> {
        let query = name.trim().to_lowercase();
        if query.is_empty() {
            return Err(DomainError::NoEmployeeMatchesName { query: name.to_owned() });
        }

        let exact: Vec<&Employee> = self
            .employees
            .iter()
            .filter(|employee| employee.name.to_lowercase() == query)
            .collect();
        match exact.as_slice() {
            [single] => return Ok(single),
            [] => {}
            many => {
                return Err(DomainError::AmbiguousEmployeeName {
                    query: name.to_owned(),
                    matches: many.iter().map(|e| describe(e)).collect(),
                })
            }
        }

        let prefixed: Vec<&Employee> = self
            .employees
            .iter()
            .filter(|employee| employee.name.to_lowercase().starts_with(&query))
            .collect();
        match prefixed.as_slice() {
            [single] => Ok(single),
            [] => Err(DomainError::NoEmployeeMatchesName { query: name.to_owned() }),
            many => Err(DomainError::AmbiguousEmployeeName {
                query: name.to_owned(),
                matches: many.iter().map(|e| describe(e)).collect(),
            }),
        }
    }

    pub fn all(&self) -> &[Employee] {
        &self.employees
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }
}

fn describe(employee: &Employee) -> String {
    format!("{} ({})", employee.name, employee.id)
}

impl RosterFile {
    fn into_employees(self) -> Vec<Employee> {
        self.employees
            .into_iter()
            .map(|raw| Employee {
                id: EmployeeId::new(&raw.id),
                name: raw.name,
                department: raw.department,
                role: raw.role,
                email: raw.email,
                gender: raw.gender,
                manager_id: raw.manager_id.as_deref().map(EmployeeId::new),
            })
            .collect()
    }
}
