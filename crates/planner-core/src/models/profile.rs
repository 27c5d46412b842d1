// ABOUTME: User profile model with bounded numeric fields and labelled enumerations
// ABOUTME: Enumerations parse from and display as the Chinese labels used by the form
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Health Planner Contributors

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::constants::profile_bounds::{
    MAX_AGE, MAX_HEIGHT_CM, MAX_WEIGHT_KG, MIN_AGE, MIN_HEIGHT_CM, MIN_WEIGHT_KG,
};
use crate::errors::{AppError, AppResult};

/// Declares a form enumeration whose variants round-trip through their labels
macro_rules! labelled_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $($(#[$vmeta:meta])* $variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* #[serde(rename = $label)] $variant),+
        }

        impl $name {
            /// Every option in form order
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Label shown in the form and interpolated into prompts
            #[must_use]
            pub const fn label(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = AppError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|option| option.label() == trimmed)
                    .ok_or_else(|| {
                        AppError::invalid_input(format!("{}: 未知选项 '{trimmed}'", $field))
                    })
            }
        }
    };
}

labelled_enum! {
    /// Sex as selected in the profile form
    Sex, "性别" {
        /// Female
        Female => "女性",
        /// Male
        Male => "男性",
        /// Other
        Other => "其他",
    }
}

labelled_enum! {
    /// Typical daily activity level
    ActivityLevel, "活动水平" {
        /// Sedentary
        Sedentary => "久坐",
        /// Lightly active
        LightlyActive => "轻度活跃",
        /// Moderately active
        ModeratelyActive => "中度活跃",
        /// Very active
        VeryActive => "非常活跃",
        /// Extremely active
        ExtremelyActive => "极度活跃",
        /// No exercise at all
        Inactive => "不运动",
    }
}

labelled_enum! {
    /// Dietary preference or restriction
    DietaryPreference, "饮食偏好" {
        /// Vegetarian
        Vegetarian => "素食",
        /// Mixed diet
        Balanced => "荤素搭配",
        /// Ketogenic
        Keto => "生酮",
        /// Gluten free
        GlutenFree => "无麸质",
        /// Low carbohydrate
        LowCarb => "低碳水",
        /// Dairy free
        DairyFree => "无乳制品",
    }
}

labelled_enum! {
    /// Primary fitness goal
    FitnessGoal, "健身目标" {
        /// Lose weight
        WeightLoss => "减肥",
        /// Build muscle
        MuscleGain => "增肌",
        /// Endurance
        Endurance => "耐力",
        /// Stay healthy
        StayFit => "保持健康",
        /// Strength training
        Strength => "力量训练",
        /// Body toning
        Toning => "塑形",
    }
}

/// Personal and fitness attributes collected by the profile form
///
/// Rebuilt from the submitted form every time plans are generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Age in years
    pub age: u8,
    /// Weight in kilograms
    pub weight_kg: f32,
    /// Height in centimetres
    pub height_cm: f32,
    /// Sex
    pub sex: Sex,
    /// Activity level
    pub activity_level: ActivityLevel,
    /// Dietary preference
    pub dietary_preference: DietaryPreference,
    /// Fitness goal
    pub fitness_goal: FitnessGoal,
}

impl UserProfile {
    /// Build a profile, rejecting values outside the form bounds
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` when age, weight or height is out of bounds.
    pub fn new(
        age: u8,
        weight_kg: f32,
        height_cm: f32,
        sex: Sex,
        activity_level: ActivityLevel,
        dietary_preference: DietaryPreference,
        fitness_goal: FitnessGoal,
    ) -> AppResult<Self> {
        let profile = Self {
            age,
            weight_kg,
            height_cm,
            sex,
            activity_level,
            dietary_preference,
            fitness_goal,
        };
        profile.validate()?;
        Ok(profile)
    }

    /// Check every numeric field against the form bounds
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` naming the first offending field.
    pub fn validate(&self) -> AppResult<()> {
        if !(MIN_AGE..=MAX_AGE).contains(&self.age) {
            return Err(AppError::out_of_range(format!(
                "年龄必须在 {MIN_AGE} 到 {MAX_AGE} 之间"
            )));
        }
        if !self.weight_kg.is_finite() || !(MIN_WEIGHT_KG..=MAX_WEIGHT_KG).contains(&self.weight_kg)
        {
            return Err(AppError::out_of_range(format!(
                "体重必须在 {MIN_WEIGHT_KG} 到 {MAX_WEIGHT_KG} kg 之间"
            )));
        }
        if !self.height_cm.is_finite() || !(MIN_HEIGHT_CM..=MAX_HEIGHT_CM).contains(&self.height_cm)
        {
            return Err(AppError::out_of_range(format!(
                "身高必须在 {MIN_HEIGHT_CM} 到 {MAX_HEIGHT_CM} cm 之间"
            )));
        }
        Ok(())
    }

    /// One-line summary used in failure reports and logs
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "年龄={}, 体重={}, 身高={}, 性别={}",
            self.age, self.weight_kg, self.height_cm, self.sex
        )
    }
}
