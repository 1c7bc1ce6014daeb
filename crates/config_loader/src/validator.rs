//! 配置校验模块
//!
//! 校验规则：
//! - ack.queue_capacity > 0
//! - observability.log_level 非空

use contracts::{ContractError, GatewayBlueprint};

/// 校验 GatewayBlueprint 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(blueprint: &GatewayBlueprint) -> Result<(), ContractError> {
    validate_ack(blueprint)?;
    validate_observability(blueprint)?;
    Ok(())
}

/// 校验 ack 队列容量
fn validate_ack(blueprint: &GatewayBlueprint) -> Result<(), ContractError> {
    if blueprint.ack.queue_capacity == 0 {
        return Err(ContractError::config_validation(
            "ack.queue_capacity",
            "queue_capacity must be > 0",
        ));
    }
    Ok(())
}

/// 校验日志级别
fn validate_observability(blueprint: &GatewayBlueprint) -> Result<(), ContractError> {
    if blueprint.observability.log_level.trim().is_empty() {
        return Err(ContractError::config_validation(
            "observability.log_level",
            "log_level cannot be empty",
        ));
    }
    Ok(())
}
