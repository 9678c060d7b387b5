pub mod attendance;
pub mod counter;
pub mod driver;
pub mod expense;
pub mod invoice;
pub mod payment;
pub mod record;
pub mod role;

pub use attendance::{AttendanceStatus, DriverAttendance};
pub use counter::InvoiceCounter;
pub use driver::Driver;
pub use expense::{ChargedTo, Expense, ExpenseCategory, ExpenseStatus};
pub use invoice::{Invoice, InvoiceItem, InvoiceStatus, InvoiceType, RelatedParty};
pub use payment::{Payment, PaymentParty, PaymentStatus, PaymentType};
pub use record::{Collection, Delivery, RecordStatus, round2};
pub use role::{Capability, Role};
