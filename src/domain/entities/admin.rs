use serde::{Deserialize, Serialize};

use crate::domain::entities::form::{
    check_choice, choice_value, date_value, flag_value, id_value, number_value, opt_text_value,
    text_value, Editable, FieldKind, FormField, QuickAction,
};
use crate::domain::entities::record::{
    Column, FieldValue, Reconcilable, Record, RecordId, ValidationError,
};

pub const MAX_COMMISSION_PERCENT: f64 = 20.0;

pub const APPLICATION_STATUSES: &[&str] = &["pending", "approved", "rejected"];
pub const USER_ROLES: &[&str] = &["partner", "admin"];
pub const DEAL_REVIEW_STATUSES: &[&str] = &["pending", "verified", "flagged"];
pub const DEAL_PAYMENT_STATUSES: &[&str] = &["pending", "in_progress", "ready_to_claim", "claimed"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdminEntity {
    Developers,
    Projects,
    Commissions,
    Applications,
    Deals,
    Inventory,
    Launches,
    Users,
}

impl AdminEntity {
    pub const ALL: [AdminEntity; 8] = [
        AdminEntity::Developers,
        AdminEntity::Projects,
        AdminEntity::Commissions,
        AdminEntity::Applications,
        AdminEntity::Deals,
        AdminEntity::Inventory,
        AdminEntity::Launches,
        AdminEntity::Users,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AdminEntity::Developers => "Developers",
            AdminEntity::Projects => "Projects",
            AdminEntity::Commissions => "Commission Rates",
            AdminEntity::Applications => "Applications",
            AdminEntity::Deals => "Deals",
            AdminEntity::Inventory => "Inventory",
            AdminEntity::Launches => "Launches",
            AdminEntity::Users => "Users",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            AdminEntity::Developers => "developers",
            AdminEntity::Projects => "projects",
            AdminEntity::Commissions => "commissions",
            AdminEntity::Applications => "applications",
            AdminEntity::Deals => "deals",
            AdminEntity::Inventory => "inventory",
            AdminEntity::Launches => "launches",
            AdminEntity::Users => "users",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|entity| entity.slug() == slug)
    }

    pub fn csv_filename(&self) -> String {
        format!("{}.csv", self.slug())
    }

    pub fn empty_message(&self) -> &'static str {
        match self {
            AdminEntity::Developers => "No developers found",
            AdminEntity::Projects => "No projects found",
            AdminEntity::Commissions => "No commission rates found",
            AdminEntity::Applications => "No applications found",
            AdminEntity::Deals => "No deals found",
            AdminEntity::Inventory => "No inventory items found",
            AdminEntity::Launches => "No launches found",
            AdminEntity::Users => "No users found",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Developer {
    pub name: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub created_at: Option<String>,
}

const DEVELOPER_COLUMNS: &[Column] = &[
    Column::sortable("name", "Name"),
    Column::plain("description", "Description"),
    Column::sortable("created_at", "Created"),
];

impl Record for Developer {
    fn columns() -> &'static [Column] {
        DEVELOPER_COLUMNS
    }

    fn natural_key(&self) -> &str {
        &self.name
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }

    fn field(&self, name: &str) -> FieldValue {
        match name {
            "name" => FieldValue::text(&self.name),
            "description" => FieldValue::opt_text(self.description.as_deref()),
            "logo_url" => FieldValue::opt_text(self.logo_url.as_deref()),
            "created_at" => FieldValue::opt_date(self.created_at.as_deref()),
            _ => FieldValue::Null,
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Required("name"));
        }
        Ok(())
    }
}

const DEVELOPER_FORM: &[FormField] = &[
    FormField::required("name", "Name", FieldKind::Text),
    FormField::optional("description", "Description", FieldKind::LongText),
    FormField::optional("logo_url", "Logo URL", FieldKind::Text),
];

impl Editable for Developer {
    const CREATABLE: bool = true;

    fn form_fields() -> &'static [FormField] {
        DEVELOPER_FORM
    }

    fn set_form_value(&mut self, field: &FormField, value: &str) -> Result<(), ValidationError> {
        match field.key {
            "name" => self.name = text_value(value),
            "description" => self.description = opt_text_value(value),
            "logo_url" => self.logo_url = opt_text_value(value),
            _ => {}
        }
        Ok(())
    }
}

impl Reconcilable for Developer {
    type Derived = Option<String>;

    fn derived_key(candidate: &Self::Derived) -> Option<&str> {
        candidate.as_deref()
    }

    fn from_derived(candidate: Self::Derived) -> Self {
        Developer {
            name: candidate.unwrap_or_default(),
            ..Developer::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Project {
    pub name: String,
    pub developer_id: Option<RecordId>,
    pub developer_name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub created_at: Option<String>,
}

/// Developer label shown for compounds inferred from inventory.
pub const VARIOUS_DEVELOPERS: &str = "Various";

const PROJECT_COLUMNS: &[Column] = &[
    Column::sortable("name", "Name"),
    Column::sortable("developer_name", "Developer"),
    Column::sortable("location", "Location"),
    Column::sortable("created_at", "Created"),
];

impl Record for Project {
    fn columns() -> &'static [Column] {
        PROJECT_COLUMNS
    }

    fn natural_key(&self) -> &str {
        &self.name
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        if let Some(developer) = self.developer_name.as_deref() {
            fields.push(developer);
        }
        fields
    }

    fn field(&self, name: &str) -> FieldValue {
        match name {
            "name" => FieldValue::text(&self.name),
            "developer_id" => FieldValue::opt_number(self.developer_id.map(|id| id.0 as f64)),
            "developer_name" => FieldValue::opt_text(self.developer_name.as_deref()),
            "description" => FieldValue::opt_text(self.description.as_deref()),
            "location" => FieldValue::opt_text(self.location.as_deref()),
            "created_at" => FieldValue::opt_date(self.created_at.as_deref()),
            _ => FieldValue::Null,
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Required("name"));
        }
        if self.developer_id.is_none() {
            return Err(ValidationError::Required("developer"));
        }
        Ok(())
    }
}

const PROJECT_FORM: &[FormField] = &[
    FormField::required("name", "Name", FieldKind::Text),
    FormField::required("developer_id", "Developer", FieldKind::Developer),
    FormField::optional("location", "Location", FieldKind::Text),
    FormField::optional("description", "Description", FieldKind::LongText),
];

impl Editable for Project {
    const CREATABLE: bool = true;

    fn form_fields() -> &'static [FormField] {
        PROJECT_FORM
    }

    fn set_form_value(&mut self, field: &FormField, value: &str) -> Result<(), ValidationError> {
        match field.key {
            "name" => self.name = text_value(value),
            "developer_id" => self.developer_id = id_value(field, value)?,
            "location" => self.location = opt_text_value(value),
            "description" => self.description = opt_text_value(value),
            _ => {}
        }
        Ok(())
    }
}

impl Reconcilable for Project {
    type Derived = Option<String>;

    fn derived_key(candidate: &Self::Derived) -> Option<&str> {
        candidate.as_deref()
    }

    fn from_derived(candidate: Self::Derived) -> Self {
        Project {
            name: candidate.unwrap_or_default(),
            developer_name: Some(VARIOUS_DEVELOPERS.to_string()),
            ..Project::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CommissionRate {
    pub developer_id: Option<RecordId>,
    pub developer_name: String,
    pub project_id: Option<RecordId>,
    pub project_names: Option<String>,
    pub percentage: f64,
    pub created_at: Option<String>,
}

/// Project label for sheet rates that apply to a whole developer.
pub const ALL_PROJECTS: &str = "All Projects";

const COMMISSION_COLUMNS: &[Column] = &[
    Column::sortable("developer_name", "Developer"),
    Column::plain("project_names", "Projects"),
    Column::sortable("percentage", "Commission %"),
];

impl Record for CommissionRate {
    fn columns() -> &'static [Column] {
        COMMISSION_COLUMNS
    }

    fn natural_key(&self) -> &str {
        &self.developer_name
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.developer_name.as_str()];
        if let Some(projects) = self.project_names.as_deref() {
            fields.push(projects);
        }
        fields
    }

    fn field(&self, name: &str) -> FieldValue {
        match name {
            "developer_id" => FieldValue::opt_number(self.developer_id.map(|id| id.0 as f64)),
            "developer_name" => FieldValue::text(&self.developer_name),
            "project_id" => FieldValue::opt_number(self.project_id.map(|id| id.0 as f64)),
            "project_names" => FieldValue::opt_text(self.project_names.as_deref()),
            "percentage" => FieldValue::Number(self.percentage),
            "created_at" => FieldValue::opt_date(self.created_at.as_deref()),
            _ => FieldValue::Null,
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.developer_id.is_none() {
            return Err(ValidationError::Required("developer"));
        }
        if !(0.0..=MAX_COMMISSION_PERCENT).contains(&self.percentage) {
            return Err(ValidationError::PercentageOutOfRange(self.percentage));
        }
        Ok(())
    }
}

const COMMISSION_FORM: &[FormField] = &[
    FormField::required("developer_id", "Developer", FieldKind::Developer),
    FormField::optional("project_id", "Project", FieldKind::Project),
    FormField::required("percentage", "Commission %", FieldKind::Number),
];

impl Editable for CommissionRate {
    const CREATABLE: bool = true;

    fn form_fields() -> &'static [FormField] {
        COMMISSION_FORM
    }

    fn set_form_value(&mut self, field: &FormField, value: &str) -> Result<(), ValidationError> {
        match field.key {
            "developer_id" => self.developer_id = id_value(field, value)?,
            "project_id" => self.project_id = id_value(field, value)?,
            "percentage" => self.percentage = number_value(field, value)?.unwrap_or_default(),
            _ => {}
        }
        Ok(())
    }
}

/// One entry of the live commission sheet maintained outside the database.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveCommission {
    #[serde(default)]
    pub developer_name: Option<String>,
    #[serde(default)]
    pub commission_percent: f64,
    #[serde(default)]
    pub projects: Option<String>,
}

impl Reconcilable for CommissionRate {
    type Derived = LiveCommission;

    fn derived_key(candidate: &Self::Derived) -> Option<&str> {
        candidate.developer_name.as_deref()
    }

    fn from_derived(candidate: Self::Derived) -> Self {
        CommissionRate {
            developer_name: candidate.developer_name.unwrap_or_default(),
            project_names: Some(
                candidate
                    .projects
                    .filter(|p| !p.trim().is_empty())
                    .unwrap_or_else(|| ALL_PROJECTS.to_string()),
            ),
            percentage: candidate.commission_percent,
            ..CommissionRate::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Application {
    pub full_name: String,
    pub phone: String,
    pub company_name: Option<String>,
    pub status: String,
    pub has_papers: bool,
    pub notes: Option<String>,
    pub created_at: Option<String>,
}

const APPLICATION_COLUMNS: &[Column] = &[
    Column::sortable("full_name", "Name"),
    Column::plain("phone", "Phone"),
    Column::sortable("company_name", "Company"),
    Column::sortable("status", "Status"),
    Column::plain("has_papers", "Papers"),
    Column::sortable("created_at", "Submitted"),
];

impl Record for Application {
    fn columns() -> &'static [Column] {
        APPLICATION_COLUMNS
    }

    fn natural_key(&self) -> &str {
        &self.phone
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.full_name.as_str(), self.phone.as_str()];
        if let Some(company) = self.company_name.as_deref() {
            fields.push(company);
        }
        fields
    }

    fn field(&self, name: &str) -> FieldValue {
        match name {
            "full_name" => FieldValue::text(&self.full_name),
            "phone" => FieldValue::text(&self.phone),
            "company_name" => FieldValue::opt_text(self.company_name.as_deref()),
            "status" => FieldValue::text(&self.status),
            "has_papers" => FieldValue::Bool(self.has_papers),
            "notes" => FieldValue::opt_text(self.notes.as_deref()),
            "created_at" => FieldValue::opt_date(self.created_at.as_deref()),
            _ => FieldValue::Null,
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.full_name.trim().is_empty() {
            return Err(ValidationError::Required("full_name"));
        }
        if self.phone.trim().is_empty() {
            return Err(ValidationError::Required("phone"));
        }
        check_choice("status", &self.status, APPLICATION_STATUSES)
    }
}

const APPLICATION_FORM: &[FormField] = &[
    FormField::required("status", "Status", FieldKind::Choice(APPLICATION_STATUSES)),
    FormField::optional("notes", "Notes", FieldKind::LongText),
];

const APPLICATION_ACTIONS: &[QuickAction] = &[
    QuickAction {
        label: "Approve",
        field: "status",
        value: "approved",
    },
    QuickAction {
        label: "Reject",
        field: "status",
        value: "rejected",
    },
];

/// Applications arrive from the partner sign-up flow; the admin screen
/// only reviews them.
impl Editable for Application {
    const CREATABLE: bool = false;

    fn form_fields() -> &'static [FormField] {
        APPLICATION_FORM
    }

    fn quick_actions() -> &'static [QuickAction] {
        APPLICATION_ACTIONS
    }

    fn set_form_value(&mut self, field: &FormField, value: &str) -> Result<(), ValidationError> {
        match field.key {
            "status" => self.status = choice_value(field, value)?.unwrap_or_default(),
            "notes" => self.notes = opt_text_value(value),
            _ => {}
        }
        Ok(())
    }
}

/// A sale reported by a partner, awaiting review.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Deal {
    pub developer_name: String,
    pub project_name: Option<String>,
    pub client_name: String,
    pub unit_code: Option<String>,
    pub dev_sales_name: Option<String>,
    pub dev_phone: Option<String>,
    pub deal_value: f64,
    pub review_status: String,
    pub internal_note: Option<String>,
    pub payment_status: Option<String>,
    pub created_at: Option<String>,
}

const DEAL_COLUMNS: &[Column] = &[
    Column::sortable("developer_name", "Developer"),
    Column::sortable("project_name", "Project"),
    Column::sortable("client_name", "Client"),
    Column::plain("unit_code", "Unit"),
    Column::sortable("deal_value", "Value"),
    Column::sortable("review_status", "Status"),
    Column::sortable("created_at", "Submitted"),
];

impl Record for Deal {
    fn columns() -> &'static [Column] {
        DEAL_COLUMNS
    }

    fn natural_key(&self) -> &str {
        self.unit_code.as_deref().unwrap_or(self.client_name.as_str())
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.client_name.as_str()];
        fields.extend(self.project_name.as_deref());
        fields.extend(self.unit_code.as_deref());
        fields
    }

    fn field(&self, name: &str) -> FieldValue {
        match name {
            "developer_name" => FieldValue::text(&self.developer_name),
            "project_name" => FieldValue::opt_text(self.project_name.as_deref()),
            "client_name" => FieldValue::text(&self.client_name),
            "unit_code" => FieldValue::opt_text(self.unit_code.as_deref()),
            "dev_sales_name" => FieldValue::opt_text(self.dev_sales_name.as_deref()),
            "dev_phone" => FieldValue::opt_text(self.dev_phone.as_deref()),
            "deal_value" => FieldValue::Number(self.deal_value),
            "review_status" => FieldValue::text(&self.review_status),
            "internal_note" => FieldValue::opt_text(self.internal_note.as_deref()),
            "payment_status" => FieldValue::opt_text(self.payment_status.as_deref()),
            "created_at" => FieldValue::opt_date(self.created_at.as_deref()),
            _ => FieldValue::Null,
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.developer_name.trim().is_empty() {
            return Err(ValidationError::Required("developer_name"));
        }
        if self.client_name.trim().is_empty() {
            return Err(ValidationError::Required("client_name"));
        }
        if self.deal_value < 0.0 {
            return Err(ValidationError::Negative("deal_value"));
        }
        check_choice("review_status", &self.review_status, DEAL_REVIEW_STATUSES)?;
        if let Some(payment) = self.payment_status.as_deref() {
            check_choice("payment_status", payment, DEAL_PAYMENT_STATUSES)?;
        }
        Ok(())
    }
}

const DEAL_FORM: &[FormField] = &[
    FormField::required(
        "review_status",
        "Review status",
        FieldKind::Choice(DEAL_REVIEW_STATUSES),
    ),
    FormField::optional(
        "payment_status",
        "Payment status",
        FieldKind::Choice(DEAL_PAYMENT_STATUSES),
    ),
    FormField::optional("internal_note", "Internal note", FieldKind::LongText),
];

const DEAL_ACTIONS: &[QuickAction] = &[
    QuickAction {
        label: "Verify",
        field: "review_status",
        value: "verified",
    },
    QuickAction {
        label: "Flag",
        field: "review_status",
        value: "flagged",
    },
];

impl Editable for Deal {
    const CREATABLE: bool = false;

    fn form_fields() -> &'static [FormField] {
        DEAL_FORM
    }

    fn quick_actions() -> &'static [QuickAction] {
        DEAL_ACTIONS
    }

    fn set_form_value(&mut self, field: &FormField, value: &str) -> Result<(), ValidationError> {
        match field.key {
            "review_status" => self.review_status = choice_value(field, value)?.unwrap_or_default(),
            "payment_status" => self.payment_status = choice_value(field, value)?,
            "internal_note" => self.internal_note = opt_text_value(value),
            _ => {}
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct InventoryItem {
    pub unit_number: String,
    pub unit_type: String,
    pub developer_id: Option<RecordId>,
    pub developer_name: Option<String>,
    pub project_id: Option<RecordId>,
    pub project_name: Option<String>,
    pub price: Option<f64>,
    pub is_available: bool,
}

const INVENTORY_COLUMNS: &[Column] = &[
    Column::sortable("unit_number", "Unit"),
    Column::sortable("unit_type", "Type"),
    Column::sortable("developer_name", "Developer"),
    Column::sortable("project_name", "Project"),
    Column::sortable("price", "Price"),
    Column::plain("is_available", "Available"),
];

impl Record for InventoryItem {
    fn columns() -> &'static [Column] {
        INVENTORY_COLUMNS
    }

    fn natural_key(&self) -> &str {
        &self.unit_number
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.unit_number.as_str(), self.unit_type.as_str()]
    }

    fn field(&self, name: &str) -> FieldValue {
        match name {
            "unit_number" => FieldValue::text(&self.unit_number),
            "unit_type" => FieldValue::text(&self.unit_type),
            "developer_id" => FieldValue::opt_number(self.developer_id.map(|id| id.0 as f64)),
            "developer_name" => FieldValue::opt_text(self.developer_name.as_deref()),
            "project_id" => FieldValue::opt_number(self.project_id.map(|id| id.0 as f64)),
            "project_name" => FieldValue::opt_text(self.project_name.as_deref()),
            "price" => FieldValue::opt_number(self.price),
            "is_available" => FieldValue::Bool(self.is_available),
            _ => FieldValue::Null,
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.unit_number.trim().is_empty() {
            return Err(ValidationError::Required("unit_number"));
        }
        if self.developer_id.is_none() {
            return Err(ValidationError::Required("developer"));
        }
        if self.project_id.is_none() {
            return Err(ValidationError::Required("project"));
        }
        if self.price.is_some_and(|price| price < 0.0) {
            return Err(ValidationError::Negative("price"));
        }
        Ok(())
    }
}

const INVENTORY_FORM: &[FormField] = &[
    FormField::required("unit_number", "Unit", FieldKind::Text),
    FormField::required("unit_type", "Type", FieldKind::Text),
    FormField::required("developer_id", "Developer", FieldKind::Developer),
    FormField::required("project_id", "Project", FieldKind::Project),
    FormField::optional("price", "Price", FieldKind::Number),
    FormField::optional("is_available", "Available", FieldKind::Flag),
];

impl Editable for InventoryItem {
    const CREATABLE: bool = true;

    fn form_fields() -> &'static [FormField] {
        INVENTORY_FORM
    }

    fn set_form_value(&mut self, field: &FormField, value: &str) -> Result<(), ValidationError> {
        match field.key {
            "unit_number" => self.unit_number = text_value(value),
            "unit_type" => self.unit_type = text_value(value),
            "developer_id" => self.developer_id = id_value(field, value)?,
            "project_id" => self.project_id = id_value(field, value)?,
            "price" => self.price = number_value(field, value)?,
            "is_available" => self.is_available = flag_value(value),
            _ => {}
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Launch {
    pub title: String,
    pub description: Option<String>,
    pub developer_id: Option<RecordId>,
    pub developer_name: Option<String>,
    pub project_id: Option<RecordId>,
    pub project_name: Option<String>,
    pub launch_date: Option<String>,
}

const LAUNCH_COLUMNS: &[Column] = &[
    Column::sortable("title", "Title"),
    Column::sortable("developer_name", "Developer"),
    Column::sortable("project_name", "Project"),
    Column::sortable("launch_date", "Launch date"),
];

impl Record for Launch {
    fn columns() -> &'static [Column] {
        LAUNCH_COLUMNS
    }

    fn natural_key(&self) -> &str {
        &self.title
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str()];
        if let Some(description) = self.description.as_deref() {
            fields.push(description);
        }
        fields
    }

    fn field(&self, name: &str) -> FieldValue {
        match name {
            "title" => FieldValue::text(&self.title),
            "description" => FieldValue::opt_text(self.description.as_deref()),
            "developer_id" => FieldValue::opt_number(self.developer_id.map(|id| id.0 as f64)),
            "developer_name" => FieldValue::opt_text(self.developer_name.as_deref()),
            "project_id" => FieldValue::opt_number(self.project_id.map(|id| id.0 as f64)),
            "project_name" => FieldValue::opt_text(self.project_name.as_deref()),
            "launch_date" => FieldValue::opt_date(self.launch_date.as_deref()),
            _ => FieldValue::Null,
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::Required("title"));
        }
        if self.developer_id.is_none() {
            return Err(ValidationError::Required("developer"));
        }
        if self.launch_date.is_none() {
            return Err(ValidationError::Required("launch_date"));
        }
        Ok(())
    }
}

const LAUNCH_FORM: &[FormField] = &[
    FormField::required("title", "Title", FieldKind::Text),
    FormField::required("developer_id", "Developer", FieldKind::Developer),
    FormField::optional("project_id", "Project", FieldKind::Project),
    FormField::required("launch_date", "Launch date", FieldKind::Date),
    FormField::optional("description", "Description", FieldKind::LongText),
];

impl Editable for Launch {
    const CREATABLE: bool = true;

    fn form_fields() -> &'static [FormField] {
        LAUNCH_FORM
    }

    fn set_form_value(&mut self, field: &FormField, value: &str) -> Result<(), ValidationError> {
        match field.key {
            "title" => self.title = text_value(value),
            "developer_id" => self.developer_id = id_value(field, value)?,
            "project_id" => self.project_id = id_value(field, value)?,
            "launch_date" => self.launch_date = date_value(field, value)?,
            "description" => self.description = opt_text_value(value),
            _ => {}
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct UserProfile {
    pub full_name: Option<String>,
    pub phone: String,
    pub role: String,
    pub created_at: Option<String>,
}

const USER_COLUMNS: &[Column] = &[
    Column::sortable("full_name", "Name"),
    Column::plain("phone", "Phone"),
    Column::sortable("role", "Role"),
    Column::sortable("created_at", "Joined"),
];

impl Record for UserProfile {
    fn columns() -> &'static [Column] {
        USER_COLUMNS
    }

    fn natural_key(&self) -> &str {
        &self.phone
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = Vec::with_capacity(2);
        if let Some(name) = self.full_name.as_deref() {
            fields.push(name);
        }
        fields.push(self.phone.as_str());
        fields
    }

    fn field(&self, name: &str) -> FieldValue {
        match name {
            "full_name" => FieldValue::opt_text(self.full_name.as_deref()),
            "phone" => FieldValue::text(&self.phone),
            "role" => FieldValue::text(&self.role),
            "created_at" => FieldValue::opt_date(self.created_at.as_deref()),
            _ => FieldValue::Null,
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        check_choice("role", &self.role, USER_ROLES)
    }
}

const USER_FORM: &[FormField] = &[FormField::required(
    "role",
    "Role",
    FieldKind::Choice(USER_ROLES),
)];

const USER_ACTIONS: &[QuickAction] = &[
    QuickAction {
        label: "Make admin",
        field: "role",
        value: "admin",
    },
    QuickAction {
        label: "Make partner",
        field: "role",
        value: "partner",
    },
];

/// Profiles are created at sign-up; only the role is managed here.
impl Editable for UserProfile {
    const CREATABLE: bool = false;

    fn form_fields() -> &'static [FormField] {
        USER_FORM
    }

    fn quick_actions() -> &'static [QuickAction] {
        USER_ACTIONS
    }

    fn set_form_value(&mut self, field: &FormField, value: &str) -> Result<(), ValidationError> {
        if field.key == "role" {
            self.role = choice_value(field, value)?.unwrap_or_default();
        }
        Ok(())
    }
}
