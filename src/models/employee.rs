use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Employee {
    pub nrp: String,  // ⇔ employees.nrp (TEXT PRIMARY KEY)
    pub name: String, // ⇔ employees.name (NULL in legacy rows → "")
    pub quota: i64,   // ⇔ employees.quota (INTEGER, default 168)
}

impl Employee {
    pub fn has_quota(&self) -> bool {
        self.quota > 0
    }
}
