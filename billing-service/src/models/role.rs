//! Back-office roles and their capabilities, as a pure mapping over a closed
//! enum. Enforcement happens at the gateway; this is the single source of
//! truth for what each role may do inside the billing subsystem.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Vendor,
    Accountant,
    Driver,
    SocietyAdmin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ManageRecords,
    GenerateInvoices,
    RecordPayments,
    ViewOutstanding,
    MarkAttendance,
    ApproveExpenses,
    ViewSalary,
}

impl Role {
    pub fn capabilities(&self) -> &'static [Capability] {
        use Capability::*;
        match self {
            Role::SuperAdmin => &[
                ManageRecords,
                GenerateInvoices,
                RecordPayments,
                ViewOutstanding,
                MarkAttendance,
                ApproveExpenses,
                ViewSalary,
            ],
            Role::Vendor => &[
                ManageRecords,
                GenerateInvoices,
                RecordPayments,
                ViewOutstanding,
                MarkAttendance,
                ApproveExpenses,
                ViewSalary,
            ],
            Role::Accountant => &[
                GenerateInvoices,
                RecordPayments,
                ViewOutstanding,
                ViewSalary,
            ],
            Role::Driver => &[ManageRecords, MarkAttendance],
            Role::SocietyAdmin => &[ViewOutstanding],
        }
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }
}
