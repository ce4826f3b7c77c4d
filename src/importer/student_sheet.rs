// ==========================================
// 学生花名册服务 - 学生导入表字段声明
// ==========================================
// 职责: ExcelStudentRow 的列名 ↔ 字段 ↔ 类型 声明表
// ==========================================

use crate::domain::types::{Gender, MaritalStatus, SheetEnum};
use crate::domain::ExcelStudentRow;
use crate::importer::coercion::{CellValue, EnumSpec, ValueType};
use crate::importer::error::{CoercionError, CoercionResult};
use crate::importer::header_map::FieldDescriptor;
use crate::importer::row_converter::SheetRecord;

/// 学生导入表的列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StudentColumn {
    FirstName,
    LastName,
    Roll,
    Age,
    PhoneNumber,
    EmailAddress,
    Gender,
    Education,
    Occupation,
    Experience,
    Salary,
    MaritalStatus,
    NumberOfChildren,
}

static STUDENT_FIELDS: [FieldDescriptor<StudentColumn>; 13] = [
    FieldDescriptor::new(StudentColumn::FirstName, "FirstName", ValueType::Text)
        .with_header("First Name"),
    FieldDescriptor::new(StudentColumn::LastName, "LastName", ValueType::Text)
        .with_header("Last Name"),
    FieldDescriptor::new(StudentColumn::Roll, "Roll", ValueType::LargeInteger),
    FieldDescriptor::new(StudentColumn::Age, "Age", ValueType::SmallInteger),
    FieldDescriptor::new(StudentColumn::PhoneNumber, "PhoneNumber", ValueType::Text)
        .with_header("Phone"),
    FieldDescriptor::new(StudentColumn::EmailAddress, "EmailAddress", ValueType::Text)
        .with_header("Email"),
    FieldDescriptor::new(
        StudentColumn::Gender,
        "Gender",
        ValueType::Enumeration(EnumSpec::of::<Gender>()),
    ),
    FieldDescriptor::new(StudentColumn::Education, "Education", ValueType::Text),
    FieldDescriptor::new(StudentColumn::Occupation, "Occupation", ValueType::Text),
    FieldDescriptor::new(StudentColumn::Experience, "Experience", ValueType::SmallInteger)
        .with_header("Experience (Years)"),
    FieldDescriptor::new(StudentColumn::Salary, "Salary", ValueType::Decimal),
    FieldDescriptor::new(
        StudentColumn::MaritalStatus,
        "MaritalStatus",
        ValueType::Enumeration(EnumSpec::of::<MaritalStatus>()),
    )
    .with_header("Marital Status"),
    FieldDescriptor::new(
        StudentColumn::NumberOfChildren,
        "NumberOfChildren",
        ValueType::SmallInteger,
    )
    .with_header("Number of Children"),
];

/// 导入表的全部表头（按声明顺序）
pub fn student_sheet_headers() -> Vec<&'static str> {
    STUDENT_FIELDS.iter().map(|d| d.header_label()).collect()
}

fn mismatch(field: StudentColumn, expected: &str) -> CoercionError {
    CoercionError::TypeMismatch {
        field: format!("{:?}", field),
        expected: expected.to_string(),
    }
}

fn symbol_to<E: SheetEnum>(field: StudentColumn, symbol: &str) -> CoercionResult<E> {
    E::from_symbol(symbol).ok_or_else(|| mismatch(field, E::TYPE_NAME))
}

impl SheetRecord for ExcelStudentRow {
    type Field = StudentColumn;

    fn fields() -> &'static [FieldDescriptor<StudentColumn>] {
        &STUDENT_FIELDS
    }

    fn assign(&mut self, field: StudentColumn, value: CellValue) -> CoercionResult<()> {
        use StudentColumn as C;

        match (field, value) {
            (C::FirstName, CellValue::Text(v)) => self.first_name = v,
            (C::LastName, CellValue::Text(v)) => self.last_name = v,
            (C::PhoneNumber, CellValue::Text(v)) => self.phone_number = v,
            (C::EmailAddress, CellValue::Text(v)) => self.email_address = v,
            (C::Education, CellValue::Text(v)) => self.education = v,
            (C::Occupation, CellValue::Text(v)) => self.occupation = v,
            (C::Roll, CellValue::LargeInteger(v)) => self.roll = v,
            (C::Age, CellValue::SmallInteger(v)) => self.age = v,
            (C::Experience, CellValue::SmallInteger(v)) => self.experience = v,
            (C::NumberOfChildren, CellValue::SmallInteger(v)) => self.number_of_children = v,
            (C::Salary, CellValue::Decimal(v)) => self.salary = v,
            (C::Gender, CellValue::Symbol(s)) => self.gender = symbol_to(field, s)?,
            (C::MaritalStatus, CellValue::Symbol(s)) => {
                self.marital_status = symbol_to(field, s)?
            }
            (field, _) => {
                let expected = STUDENT_FIELDS
                    .iter()
                    .find(|d| d.field == field)
                    .map(|d| d.value_type.display_name())
                    .unwrap_or("未知");
                return Err(mismatch(field, expected));
            }
        }
        Ok(())
    }
}
