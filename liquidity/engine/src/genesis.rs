use {
    crate::{LiquidityError, LiquidityResult},
    config::{Config, Environment, File},
    liquidity_types::{
        amm::{Params, PoolType},
        IsZero, NumberConst, Udec128,
    },
    serde::{Deserialize, Serialize},
    std::{collections::BTreeSet, path::Path},
};

/// Prefix of environment variables that override values of the genesis file,
/// e.g. `LIQUIDITY__PARAMS__SWAP_FEE_RATE=0.001`.
pub const ENV_PREFIX: &str = "LIQUIDITY";

/// The module's genesis state, as written in a TOML file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GenesisConfig {
    pub params: Params,
}

/// Load the genesis config from a file, applying overrides from the
/// environment, and validate it.
pub fn load_genesis_config<P>(path: P) -> LiquidityResult<GenesisConfig>
where
    P: AsRef<Path>,
{
    let config: GenesisConfig = Config::builder()
        .add_source(File::from(path.as_ref()))
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()
        .and_then(|config| config.try_deserialize())
        .map_err(LiquidityError::invalid_params)?;

    validate_params(&config.params)?;

    Ok(config)
}

pub fn validate_params(params: &Params) -> LiquidityResult<()> {
    for (name, rate) in [
        ("swap fee rate", params.swap_fee_rate),
        ("withdraw fee rate", params.withdraw_fee_rate),
        ("max price impact", params.max_price_impact),
    ] {
        ensure_below_one(name, rate)?;
    }

    if params.max_order_amount_ratio.is_zero() || params.max_order_amount_ratio > Udec128::ONE {
        return Err(LiquidityError::invalid_params(format!(
            "max order amount ratio must be within (0, 1], got {}",
            params.max_order_amount_ratio
        )));
    }

    if params.unit_batch_height == 0 {
        return Err(LiquidityError::invalid_params(
            "unit batch height must be at least 1",
        ));
    }

    if params.max_batch_age_blocks < params.unit_batch_height {
        return Err(LiquidityError::invalid_params(format!(
            "max batch age {} is shorter than the unit batch height {}",
            params.max_batch_age_blocks, params.unit_batch_height
        )));
    }

    if params.initial_pool_coin_supply.is_zero() {
        return Err(LiquidityError::invalid_params(
            "initial pool coin supply must be non-zero",
        ));
    }

    validate_pool_types(&params.pool_types)
}

fn ensure_below_one(name: &str, rate: Udec128) -> LiquidityResult<()> {
    if rate >= Udec128::ONE {
        return Err(LiquidityError::invalid_params(format!(
            "{name} must be less than 1, got {rate}"
        )));
    }

    Ok(())
}

fn validate_pool_types(pool_types: &[PoolType]) -> LiquidityResult<()> {
    if pool_types.is_empty() {
        return Err(LiquidityError::invalid_params("no pool types"));
    }

    let mut ids = BTreeSet::new();

    for pool_type in pool_types {
        if !ids.insert(pool_type.id) {
            return Err(LiquidityError::invalid_params(format!(
                "duplicate pool type id {}",
                pool_type.id
            )));
        }

        if let Some(max_price_impact) = pool_type.max_price_impact {
            ensure_below_one("max price impact of pool type", max_price_impact)?;
        }
    }

    Ok(())
}

// ----------------------------------- tests -----------------------------------
