// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use chrono::Utc;
use rust_decimal::Decimal;
use student_roster::{Gender, MaritalStatus, Student};
use uuid::Uuid;

// ==========================================
// 表格行构建器（按标准表头顺序输出单元格文本）
// ==========================================

pub struct SheetRowBuilder {
    cells: [String; 13],
}

impl SheetRowBuilder {
    pub fn new(first_name: &str, last_name: &str, roll: &str) -> Self {
        Self {
            cells: [
                first_name.to_string(),
                last_name.to_string(),
                roll.to_string(),
                "20".to_string(),
                "01700000000".to_string(),
                format!("{}@example.com", first_name.to_lowercase()),
                "Female".to_string(),
                "BSc".to_string(),
                "Engineer".to_string(),
                "1".to_string(),
                "1000.50".to_string(),
                "Single".to_string(),
                "0".to_string(),
            ],
        }
    }

    pub fn age(mut self, age: &str) -> Self {
        self.cells[3] = age.to_string();
        self
    }

    pub fn gender(mut self, gender: &str) -> Self {
        self.cells[6] = gender.to_string();
        self
    }

    pub fn salary(mut self, salary: &str) -> Self {
        self.cells[10] = salary.to_string();
        self
    }

    pub fn marital_status(mut self, status: &str) -> Self {
        self.cells[11] = status.to_string();
        self
    }

    /// 清空指定列（0 起）
    pub fn blank(mut self, index: usize) -> Self {
        self.cells[index].clear();
        self
    }

    pub fn build(self) -> Vec<String> {
        self.cells.to_vec()
    }
}

// ==========================================
// Student 实体构建器
// ==========================================

pub struct StudentBuilder {
    first_name: String,
    last_name: String,
    roll: i64,
    age: i32,
}

impl StudentBuilder {
    pub fn new(first_name: &str, last_name: &str) -> Self {
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            roll: 1,
            age: 20,
        }
    }

    pub fn roll(mut self, roll: i64) -> Self {
        self.roll = roll;
        self
    }

    pub fn age(mut self, age: i32) -> Self {
        self.age = age;
        self
    }

    pub fn build(self) -> Student {
        let now = Utc::now();
        Student {
            id: Uuid::new_v4(),
            email_address: format!("{}@example.com", self.first_name.to_lowercase()),
            first_name: self.first_name,
            last_name: self.last_name,
            roll: self.roll,
            age: self.age,
            phone_number: "01700000000".to_string(),
            gender: Gender::Female,
            education: "BSc".to_string(),
            occupation: "Engineer".to_string(),
            experience: 1,
            salary: Decimal::new(100050, 2),
            marital_status: MaritalStatus::Single,
            number_of_children: 0,
            created_at: now,
            last_updated: now,
        }
    }
}

/// 生成 n 个学生（名字 S01..Snn，学号 1..n）
pub fn numbered_students(n: usize) -> Vec<Student> {
    (1..=n)
        .map(|i| {
            StudentBuilder::new(&format!("S{:02}", i), "Numbered")
                .roll(i as i64)
                .age(18 + (i % 10) as i32)
                .build()
        })
        .collect()
}
