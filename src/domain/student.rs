// ==========================================
// 学生花名册服务 - 学生领域模型
// ==========================================
// 实体: Student（持久化）/ StudentDto（对外）/ ExcelStudentRow（导入行）
// 对齐: student 表
// ==========================================

use crate::domain::types::{Gender, MaritalStatus};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// Student - 学生实体
// ==========================================
// 用途: 导入层创建，仓储层写入，查询层只读
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    // ===== 主键 =====
    pub id: Uuid,

    // ===== 基础信息 =====
    pub first_name: String,
    pub last_name: String,
    pub roll: i64,        // 学号
    pub age: i32,
    pub phone_number: String,
    pub email_address: String,
    pub gender: Gender,

    // ===== 职业信息 =====
    pub education: String,
    pub occupation: String,
    pub experience: i32,  // 工作年限
    pub salary: Decimal,

    // ===== 家庭信息 =====
    pub marital_status: MaritalStatus,
    pub number_of_children: i32,

    // ===== 审计字段 =====
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl Student {
    /// 转换为对外展示的 DTO（枚举输出为符号名）
    pub fn to_dto(&self) -> StudentDto {
        StudentDto {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            roll: self.roll,
            age: self.age,
            phone_number: self.phone_number.clone(),
            email_address: self.email_address.clone(),
            gender: self.gender.to_string(),
            education: self.education.clone(),
            occupation: self.occupation.clone(),
            experience: self.experience,
            salary: self.salary,
            marital_status: self.marital_status.to_string(),
            number_of_children: self.number_of_children,
            last_updated: self.last_updated,
        }
    }
}

// ==========================================
// StudentDto - 对外展示模型
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDto {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub roll: i64,
    pub age: i32,
    pub phone_number: String,
    pub email_address: String,
    pub gender: String,
    pub education: String,
    pub occupation: String,
    pub experience: i32,
    pub salary: Decimal,
    pub marital_status: String,
    pub number_of_children: i32,
    pub last_updated: DateTime<Utc>,
}

// ==========================================
// ExcelStudentRow - 导入表格的一行
// ==========================================
// 空白单元格保持零值（Default）
// 列名 ↔ 字段的声明见 importer::student_sheet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExcelStudentRow {
    pub first_name: String,
    pub last_name: String,
    pub roll: i64,
    pub age: i32,
    pub phone_number: String,
    pub email_address: String,
    pub gender: Gender,
    pub education: String,
    pub occupation: String,
    pub experience: i32,
    pub salary: Decimal,
    pub marital_status: MaritalStatus,
    pub number_of_children: i32,
}

impl ExcelStudentRow {
    /// 转换为实体：分配新的 v4 UUID，创建/更新时间取当前 UTC 时间
    pub fn into_entity(self) -> Student {
        let now = Utc::now();
        Student {
            id: Uuid::new_v4(),
            first_name: self.first_name,
            last_name: self.last_name,
            roll: self.roll,
            age: self.age,
            phone_number: self.phone_number,
            email_address: self.email_address,
            gender: self.gender,
            education: self.education,
            occupation: self.occupation,
            experience: self.experience,
            salary: self.salary,
            marital_status: self.marital_status,
            number_of_children: self.number_of_children,
            created_at: now,
            last_updated: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_entity_assigns_identity_and_timestamps() {
        let row = ExcelStudentRow {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            roll: 7,
            gender: Gender::Female,
            ..Default::default()
        };

        let a = row.clone().into_entity();
        let b = row.into_entity();

        assert_ne!(a.id, b.id);
        assert_eq!(a.created_at, a.last_updated);
        assert_eq!(a.roll, 7);
        assert_eq!(a.gender, Gender::Female);
    }

    #[test]
    fn test_to_dto_renders_enum_symbols() {
        let student = ExcelStudentRow {
            first_name: "Grace".to_string(),
            marital_status: MaritalStatus::Married,
            ..Default::default()
        }
        .into_entity();

        let dto = student.to_dto();
        assert_eq!(dto.gender, "Male");
        assert_eq!(dto.marital_status, "Married");

        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["firstName"], "Grace");
        assert_eq!(json["maritalStatus"], "Married");
    }
}
