/*
 * Teacher Dashboard, keeping class tracking organized
 * Copyright (C) 2019-2020 Adrien 'Litarvan' Navratil
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */
use std::collections::HashMap;
use std::fmt;

use log::debug;
use serde::Serialize;

use crate::api::types::ReferenceData;

#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub enum Field {
    Department,
    Year,
    Division,
    Subject,
    Paper
}

impl Field {
    pub const ALL: [Field; 5] = [Field::Department, Field::Year, Field::Division, Field::Subject, Field::Paper];

    /// Name of the field on the wire
    pub fn key(&self) -> &'static str {
        match self {
            Field::Department => "department",
            Field::Year => "year",
            Field::Division => "division",
            Field::Subject => "subject",
            Field::Paper => "paper"
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Field::Department => "Department",
            Field::Year => "Year",
            Field::Division => "Division",
            Field::Subject => "Subject",
            Field::Paper => "Paper"
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Year {
    FE,
    SE,
    TE,
    BE
}

impl Year {
    pub const ALL: [Year; 4] = [Year::FE, Year::SE, Year::TE, Year::BE];

    pub fn code(&self) -> &'static str {
        match self {
            Year::FE => "FE",
            Year::SE => "SE",
            Year::TE => "TE",
            Year::BE => "BE"
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Year::FE => "First Year (FE)",
            Year::SE => "Second Year (SE)",
            Year::TE => "Third Year (TE)",
            Year::BE => "Final Year (BE)"
        }
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Division {
    A, B, C, D, E, F
}

impl Division {
    pub const ALL: [Division; 6] = [Division::A, Division::B, Division::C, Division::D, Division::E, Division::F];

    pub fn code(&self) -> &'static str {
        match self {
            Division::A => "A",
            Division::B => "B",
            Division::C => "C",
            Division::D => "D",
            Division::E => "E",
            Division::F => "F"
        }
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Paper {
    FA1,
    FA2,
    SA
}

impl Paper {
    pub const ALL: [Paper; 3] = [Paper::FA1, Paper::FA2, Paper::SA];

    pub fn code(&self) -> &'static str {
        match self {
            Paper::FA1 => "FA1",
            Paper::FA2 => "FA2",
            Paper::SA => "SA"
        }
    }
}

/// The class a page is looking at. An empty string means the field isn't chosen yet.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub department: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub year: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub division: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub subject: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub paper: String
}

impl FilterSelection {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Department => &self.department,
            Field::Year => &self.year,
            Field::Division => &self.division,
            Field::Subject => &self.subject,
            Field::Paper => &self.paper
        }
    }

    fn slot(&mut self, field: Field) -> &mut String {
        match field {
            Field::Department => &mut self.department,
            Field::Year => &mut self.year,
            Field::Division => &mut self.division,
            Field::Subject => &mut self.subject,
            Field::Paper => &mut self.paper
        }
    }

    /// Replaces the whole value of a field, returns false if nothing changed.
    pub fn set(&mut self, field: Field, value: &str) -> bool {
        let slot = self.slot(field);
        if slot.as_str() == value {
            return false;
        }

        *slot = value.to_string();
        true
    }

    pub fn is_set(&self, field: Field) -> bool {
        !self.get(field).is_empty()
    }

    pub fn is_complete(&self, required: &[Field]) -> bool {
        required.iter().all(|f| self.is_set(*f))
    }

    pub fn missing(&self, required: &[Field]) -> Option<Field> {
        required.iter().copied().find(|f| !self.is_set(*f))
    }

    /// Same selection keeping only the given fields.
    pub fn project(&self, fields: &[Field]) -> FilterSelection {
        let mut result = FilterSelection::default();
        for field in fields {
            result.set(*field, self.get(*field));
        }

        result
    }

    pub fn pairs(&self) -> Vec<(&'static str, &str)> {
        Field::ALL.iter()
            .filter(|f| self.is_set(**f))
            .map(|f| (f.key(), self.get(*f)))
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String
}

impl SelectOption {
    fn same(value: &str) -> SelectOption {
        SelectOption {
            value: value.to_string(),
            label: value.to_string()
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldView {
    pub field: Field,
    pub value: String,
    pub options: Vec<SelectOption>,
    pub enabled: bool
}

/// Dependent select boxes of a page: the selection, where each field gets its
/// options from, and which fields wait on others before they can be used.
pub struct CascadingFilter {
    selection: FilterSelection,
    reference: ReferenceData,
    scoped: HashMap<Field, Vec<String>>,
    dependencies: Vec<(Field, Vec<Field>)>,
    reset_stale_options: bool
}

impl CascadingFilter {
    pub fn new(reset_stale_options: bool) -> CascadingFilter {
        CascadingFilter {
            selection: FilterSelection::default(),
            reference: ReferenceData::default(),
            scoped: HashMap::new(),
            dependencies: Vec::new(),
            reset_stale_options
        }
    }

    pub fn with_dependency(mut self, field: Field, governing: &[Field]) -> CascadingFilter {
        self.dependencies.push((field, governing.to_vec()));
        self
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn set_reference(&mut self, reference: ReferenceData) {
        self.reference = reference;
    }

    pub fn set(&mut self, field: Field, value: &str) -> bool {
        if !self.selection.set(field, value) {
            return false;
        }

        if self.reset_stale_options {
            let stale: Vec<Field> = self.dependencies.iter()
                .filter(|(dependent, governing)| governing.contains(&field) && !self.selection.is_complete(governing) && self.scoped.contains_key(dependent))
                .map(|(dependent, _)| *dependent)
                .collect();

            for dependent in stale {
                debug!("Dropping scoped options of '{}' since '{}' was unset", dependent, field);
                self.scoped.remove(&dependent);
            }
        }

        true
    }

    pub fn reset(&mut self) {
        self.selection = FilterSelection::default();
    }

    /// Options looked up for the current governing values, overriding reference data.
    pub fn set_scoped(&mut self, field: Field, values: Vec<String>) {
        self.scoped.insert(field, values);
    }

    pub fn governs(&self, changed: Field, dependent: Field) -> bool {
        self.dependencies.iter()
            .any(|(d, governing)| *d == dependent && governing.contains(&changed))
    }

    /// True when every field `field` depends on has a value.
    pub fn dependency_ready(&self, field: Field) -> bool {
        self.dependencies.iter()
            .filter(|(d, _)| *d == field)
            .all(|(_, governing)| self.selection.is_complete(governing))
    }

    pub fn options(&self, field: Field) -> Vec<SelectOption> {
        if let Some(values) = self.scoped.get(&field) {
            return values.iter().map(|v| SelectOption::same(v)).collect();
        }

        match field {
            Field::Department => self.reference.departments.iter().map(|d| SelectOption::same(d)).collect(),
            Field::Subject => self.reference.subjects.iter().map(|s| SelectOption::same(s)).collect(),
            Field::Year => Year::ALL.iter()
                .map(|y| SelectOption {
                    value: y.code().to_string(),
                    label: y.label().to_string()
                })
                .collect(),
            Field::Division => Division::ALL.iter().map(|d| SelectOption::same(d.code())).collect(),
            Field::Paper => Paper::ALL.iter().map(|p| SelectOption::same(p.code())).collect()
        }
    }

    pub fn is_enabled(&self, field: Field, loading: bool) -> bool {
        !loading && self.dependency_ready(field)
    }

    pub fn view(&self, fields: &[Field], loading: bool) -> Vec<FieldView> {
        fields.iter()
            .map(|f| FieldView {
                field: *f,
                value: self.selection.get(*f).to_string(),
                options: self.options(*f),
                enabled: self.is_enabled(*f, loading)
            })
            .collect()
    }
}
